//! Work item model.
//!
//! An item is a unit of planned work with an optional start and due date.
//! Items nest through a single `parent` pointer; children are derived by
//! the graph from those pointers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dates;

/// Opaque, stable item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ItemId> for ItemId {
    fn from(id: &ItemId) -> Self {
        id.clone()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional start/due pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    /// First day of work.
    pub start_date: Option<NaiveDate>,
    /// Last day of work (inclusive).
    pub due_date: Option<NaiveDate>,
}

impl DateSpan {
    /// Creates a span from optional ends.
    pub fn new(start_date: Option<NaiveDate>, due_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            due_date,
        }
    }

    /// Creates a span with both ends set.
    pub fn bounded(start_date: NaiveDate, due_date: NaiveDate) -> Self {
        Self::new(Some(start_date), Some(due_date))
    }

    /// A span with neither end set.
    pub fn undated() -> Self {
        Self::default()
    }

    /// Whether both ends are missing.
    pub fn is_undated(&self) -> bool {
        self.start_date.is_none() && self.due_date.is_none()
    }

    /// Inclusive duration, or `placeholder_days` when an end is missing.
    pub fn duration_days(&self, placeholder_days: i64) -> i64 {
        dates::duration_days(self.start_date, self.due_date, placeholder_days)
    }

    /// Moves every present end by `days`.
    pub fn shifted(&self, days: i64) -> Self {
        Self {
            start_date: self.start_date.map(|d| dates::add_days(d, days)),
            due_date: self.due_date.map(|d| dates::add_days(d, days)),
        }
    }
}

/// A schedulable work item.
///
/// # Invariant
/// When both dates are set, `due_date >= start_date`. The engine does not
/// reject items breaking this; [`crate::validation`] reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier.
    pub id: ItemId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// First day of work.
    pub start_date: Option<NaiveDate>,
    /// Last day of work (inclusive).
    pub due_date: Option<NaiveDate>,
    /// Containing item, if any.
    pub parent: Option<ItemId>,
}

impl Item {
    /// Creates an undated, top-level item.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_date: None,
            due_date: None,
            parent: None,
        }
    }

    /// Sets the item name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets both dates.
    pub fn with_dates(mut self, start: NaiveDate, due: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.due_date = Some(due);
        self
    }

    /// Sets the start date.
    pub fn with_start_date(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Sets the due date.
    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Sets the containing item.
    pub fn with_parent(mut self, parent: impl Into<ItemId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Current dates as a span.
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.due_date)
    }

    /// Overwrites both dates from a span.
    pub fn set_span(&mut self, span: DateSpan) {
        self.start_date = span.start_date;
        self.due_date = span.due_date;
    }

    /// Inclusive duration in days, using [`dates::PLACEHOLDER_DURATION_DAYS`]
    /// when a date is missing.
    ///
    /// Propagation results report durations with the configured placeholder
    /// instead (see `PropagationConfig::placeholder_duration_days`).
    pub fn duration_days(&self) -> i64 {
        self.span()
            .duration_days(dates::PLACEHOLDER_DURATION_DAYS)
    }
}
