//! Error types.
//!
//! [`PropagationError`] is fatal: the input was unusable and nothing was
//! computed. [`GraphIssue`] is not: the pass skipped a broken edge and
//! carried on, reporting the issue in the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ItemId;

/// Invalid input to a propagation pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropagationError {
    #[error("Root item id is empty")]
    EmptyRootId,

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Item not found: {0}")]
    UnknownItem(ItemId),

    #[error("Parent {parent} of item {item} not found")]
    UnknownParent { item: ItemId, parent: ItemId },

    #[error("Item {item} cannot be placed under {parent}")]
    InvalidParent { item: ItemId, parent: ItemId },
}

/// Inconsistency found while traversing a graph. Reported, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphIssue {
    #[error("Follows relation {predecessor} -> {successor} references a missing item")]
    DanglingRelation {
        predecessor: ItemId,
        successor: ItemId,
    },

    #[error("Item {item} references missing parent {parent}")]
    DanglingParent { item: ItemId, parent: ItemId },

    #[error("Follows cycle through {} item(s); dates left unchanged", items.len())]
    Cycle { items: Vec<ItemId> },
}

/// Failure to load a [`crate::PropagationConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PropagationError::UnknownItem("A".into()).to_string(),
            "Item not found: A"
        );
        let issue = GraphIssue::Cycle {
            items: vec!["A".into(), "B".into()],
        };
        assert!(issue.to_string().contains("2 item(s)"));
    }

    #[test]
    fn test_issue_serde_tag() {
        let issue = GraphIssue::DanglingRelation {
            predecessor: "A".into(),
            successor: "gone".into(),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "dangling_relation");
        assert_eq!(json["successor"], "gone");
    }
}
