//! Relation graph: snapshot, storage seam and affected-set builder.
//!
//! A propagation pass runs over a [`ScheduleGraph`], an explicit in-memory
//! snapshot holding adjacency lists for follows relations
//! (predecessor → successor) and containment (parent → children). The
//! snapshot is either built directly or materialized once from an
//! [`ItemStore`]; nothing is queried mid-traversal.
//!
//! [`builder::plan`] decides which items a change touches and in which
//! order they must be computed.

pub mod builder;
mod snapshot;
mod store;

pub use builder::{Role, SchedulePlan};
pub use snapshot::ScheduleGraph;
pub use store::ItemStore;
