//! Propagation engine and its scheduling rules.
//!
//! # Algorithm
//!
//! `PropagationEngine` runs one pass per root change. Leaf items follow
//! the forward rule in [`forward`]: only violated constraints push an item
//! later, and an item moving earlier pulls its successors by at most the
//! same amount. Items with children take the envelope of their children
//! ([`reconcile`]). Every item is finalized once, after all of its
//! dependencies, so diamonds converge on the tightest bound.
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Kahn (1962), "Topological sorting of large networks"

mod engine;
pub mod forward;
pub mod reconcile;
mod visited;

pub use engine::PropagationEngine;
pub use visited::Visited;
