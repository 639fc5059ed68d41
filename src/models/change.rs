//! The mutation that starts a propagation pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::{DateSpan, Item, ItemId};
use crate::error::PropagationError;

/// An item attribute whose change can trigger rescheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// The start date.
    StartDate,
    /// The due date.
    DueDate,
    /// The containing item.
    Parent,
}

impl Attribute {
    /// Canonical attribute name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartDate => "start_date",
            Self::DueDate => "due_date",
            Self::Parent => "parent",
        }
    }
}

impl FromStr for Attribute {
    type Err = PropagationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "start_date" => Ok(Self::StartDate),
            "due_date" => Ok(Self::DueDate),
            "parent" | "parent_id" => Ok(Self::Parent),
            other => Err(PropagationError::UnknownAttribute(other.to_string())),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proposed change to a single root item.
///
/// `attributes` lists what changed and drives propagation. `proposed`
/// lists the attributes whose new value is carried here; a touched but
/// unproposed attribute keeps its stored value (e.g. when a relation was
/// created and the root's dates did not move).
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_reschedule::models::{Attribute, RootChange};
///
/// let change = RootChange::new("WP-7")
///     .with_due_date(NaiveDate::from_ymd_opt(2024, 6, 1));
/// assert!(change.touches(Attribute::DueDate));
/// assert!(!change.touches(Attribute::StartDate));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootChange {
    /// Item being changed.
    pub id: ItemId,
    /// New start date, used when `proposed` holds `StartDate`.
    pub start_date: Option<NaiveDate>,
    /// New due date, used when `proposed` holds `DueDate`.
    pub due_date: Option<NaiveDate>,
    /// New parent, used when `proposed` holds `Parent`.
    pub parent: Option<ItemId>,
    /// Attributes the caller changed.
    pub attributes: BTreeSet<Attribute>,
    /// Attributes with a value carried by this change.
    #[serde(default)]
    pub proposed: BTreeSet<Attribute>,
}

impl RootChange {
    /// Creates a change touching nothing yet.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            start_date: None,
            due_date: None,
            parent: None,
            attributes: BTreeSet::new(),
            proposed: BTreeSet::new(),
        }
    }

    fn propose(&mut self, attribute: Attribute) {
        self.attributes.insert(attribute);
        self.proposed.insert(attribute);
    }

    /// Proposes a new start date.
    pub fn with_start_date(mut self, start: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.propose(Attribute::StartDate);
        self
    }

    /// Proposes a new due date.
    pub fn with_due_date(mut self, due: Option<NaiveDate>) -> Self {
        self.due_date = due;
        self.propose(Attribute::DueDate);
        self
    }

    /// Proposes both dates.
    pub fn with_dates(self, start: Option<NaiveDate>, due: Option<NaiveDate>) -> Self {
        self.with_start_date(start).with_due_date(due)
    }

    /// Proposes a new parent (`None` detaches the item).
    pub fn with_parent(mut self, parent: Option<ItemId>) -> Self {
        self.parent = parent;
        self.propose(Attribute::Parent);
        self
    }

    /// Marks attributes as changed by name without proposing values.
    ///
    /// Fails on the first unrecognised name.
    pub fn touching<I, S>(mut self, names: I) -> Result<Self, PropagationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.attributes.insert(name.as_ref().parse()?);
        }
        Ok(self)
    }

    /// Whether the given attribute is part of the change.
    pub fn touches(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }

    /// Whether any date attribute is part of the change.
    pub fn touches_dates(&self) -> bool {
        self.touches(Attribute::StartDate) || self.touches(Attribute::DueDate)
    }

    /// The root item as it looks once the change is applied.
    pub fn apply_to(&self, stored: &Item) -> Item {
        let mut item = stored.clone();
        if self.proposed.contains(&Attribute::StartDate) {
            item.start_date = self.start_date;
        }
        if self.proposed.contains(&Attribute::DueDate) {
            item.due_date = self.due_date;
        }
        if self.proposed.contains(&Attribute::Parent) {
            item.parent = self.parent.clone();
        }
        item
    }

    /// Dates the caller proposes for the root, given its stored dates.
    pub fn proposed_span(&self, stored: &Item) -> DateSpan {
        self.apply_to(stored).span()
    }
}
