//! Propagation domain models.
//!
//! Provides the data types the engine reads (items, relations, the root
//! change) and the type it produces (the propagation result).
//!
//! # Domain Mappings
//!
//! | u-reschedule | Project management | Construction | Release planning |
//! |--------------|--------------------|--------------|------------------|
//! | Item | Work package | Trade activity | Milestone |
//! | FollowsRelation | Finish-to-start link | Curing gap | Freeze period |
//! | Parent | Phase/Epic | Building section | Release train |

mod change;
mod item;
mod relation;
mod result;

pub use change::{Attribute, RootChange};
pub use item::{DateSpan, Item, ItemId};
pub use relation::FollowsRelation;
pub use result::{PropagationResult, ScheduledDates};
