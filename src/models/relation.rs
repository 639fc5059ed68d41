//! Follows (precedence) relations between items.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", precedence constraints with time lags (Ch. 2.1)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ItemId;
use crate::dates;

/// `successor` follows `predecessor`.
///
/// The successor may start no earlier than `delay` full days after the
/// predecessor's due date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowsRelation {
    /// Item that must finish first.
    pub predecessor: ItemId,
    /// Item that waits.
    pub successor: ItemId,
    /// Mandatory gap in days.
    #[serde(default)]
    pub delay: u32,
}

impl FollowsRelation {
    /// Creates a zero-delay relation.
    pub fn new(predecessor: impl Into<ItemId>, successor: impl Into<ItemId>) -> Self {
        Self {
            predecessor: predecessor.into(),
            successor: successor.into(),
            delay: 0,
        }
    }

    /// Sets the mandatory gap.
    pub fn with_delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    /// Earliest start this relation allows for the successor.
    pub fn earliest_start(&self, predecessor_due: Option<NaiveDate>) -> Option<NaiveDate> {
        dates::earliest_successor_start(predecessor_due, self.delay)
    }

    /// Whether the relation links an item to itself.
    pub fn is_self_relation(&self) -> bool {
        self.predecessor == self.successor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_builder() {
        let r = FollowsRelation::new("A", "B").with_delay(2);
        assert_eq!(r.predecessor.as_str(), "A");
        assert_eq!(r.successor.as_str(), "B");
        assert_eq!(r.delay, 2);
        assert!(!r.is_self_relation());
        assert!(FollowsRelation::new("A", "A").is_self_relation());
    }

    #[test]
    fn test_relation_earliest_start() {
        let due = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let r = FollowsRelation::new("A", "B").with_delay(3);
        assert_eq!(
            r.earliest_start(Some(due)),
            NaiveDate::from_ymd_opt(2024, 5, 14)
        );
        assert_eq!(r.earliest_start(None), None);
    }

    #[test]
    fn test_relation_delay_defaults_to_zero() {
        let r: FollowsRelation =
            serde_json::from_str(r#"{"predecessor":"A","successor":"B"}"#).unwrap();
        assert_eq!(r.delay, 0);
    }
}
