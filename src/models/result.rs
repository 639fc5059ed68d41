//! Propagation result model.
//!
//! The result is the only output of a pass: new dates for every item that
//! must change, plus any graph inconsistencies that were skipped on the way.
//! Applying it is up to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{DateSpan, ItemId};
use crate::error::GraphIssue;

/// Newly computed dates for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDates {
    /// New start date.
    pub start_date: Option<NaiveDate>,
    /// New due date.
    pub due_date: Option<NaiveDate>,
    /// Derived inclusive duration in days (for display).
    pub duration_days: i64,
}

impl ScheduledDates {
    /// Builds the record from a span, deriving the duration.
    pub fn from_span(span: DateSpan, placeholder_days: i64) -> Self {
        Self {
            start_date: span.start_date,
            due_date: span.due_date,
            duration_days: span.duration_days(placeholder_days),
        }
    }

    /// The dates as a span.
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.due_date)
    }
}

/// Outcome of a propagation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationResult {
    /// Items whose dates changed, keyed by id.
    pub changes: BTreeMap<ItemId, ScheduledDates>,
    /// Inconsistencies skipped during the pass.
    pub issues: Vec<GraphIssue>,
    /// Root movement in days that drove the pass (negative = earlier).
    pub delta_days: i64,
}

impl PropagationResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records new dates for an item.
    pub fn insert(&mut self, id: ItemId, dates: ScheduledDates) {
        self.changes.insert(id, dates);
    }

    /// Records a skipped inconsistency.
    pub fn add_issue(&mut self, issue: GraphIssue) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    /// New dates for an item, if it changed.
    pub fn get(&self, id: &ItemId) -> Option<&ScheduledDates> {
        self.changes.get(id)
    }

    /// Whether the item is part of the result.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.changes.contains_key(id)
    }

    /// Whether nothing needs to change.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed items.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Ids of changed items, in id order.
    pub fn changed_ids(&self) -> Vec<&ItemId> {
        self.changes.keys().collect()
    }

    /// Iterates over changed items in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &ScheduledDates)> {
        self.changes.iter()
    }

    /// Whether any inconsistency was skipped.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
