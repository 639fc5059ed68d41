//! Schedule propagation for the U-Engine ecosystem.
//!
//! Given one changed work item and a graph of precedence ("follows") and
//! containment (parent/child) relations, computes the minimal set of date
//! updates every other item needs so that all constraints hold again.
//! The crate is pure computation: storage, authorization and transport are
//! the caller's business.
//!
//! # Modules
//!
//! - **`models`**: Domain types (`Item`, `DateSpan`, `FollowsRelation`,
//!   `RootChange`, `PropagationResult`)
//! - **`dates`**: Day arithmetic on optional calendar dates
//! - **`graph`**: In-memory snapshot (`ScheduleGraph`), the `ItemStore` seam
//!   and the affected-set builder
//! - **`scheduler`**: `PropagationEngine` (follows propagation, parent/child
//!   reconciliation)
//! - **`validation`**: Graph integrity checks and relation-creation checks
//! - **`config`**: Engine policy (`PropagationConfig`)
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_reschedule::graph::ScheduleGraph;
//! use u_reschedule::models::{FollowsRelation, Item, RootChange};
//! use u_reschedule::scheduler::PropagationEngine;
//!
//! let day = |d: u32| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
//!
//! let mut graph = ScheduleGraph::new();
//! graph.insert_item(Item::new("design").with_dates(day(1), day(4)));
//! graph.insert_item(Item::new("build").with_dates(day(5), day(7)));
//! graph.add_follows(FollowsRelation::new("design", "build"));
//!
//! let change = RootChange::new("design").with_due_date(Some(day(9)));
//! let result = PropagationEngine::new().propagate(&graph, &change).unwrap();
//!
//! let build = result.get(&"build".into()).unwrap();
//! assert_eq!(build.start_date, Some(day(10)));
//! assert_eq!(build.due_date, Some(day(12)));
//! ```
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

pub mod config;
pub mod dates;
pub mod error;
pub mod graph;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::{BackwardPolicy, PropagationConfig};
pub use error::{GraphIssue, PropagationError};
pub use scheduler::PropagationEngine;
