//! Per-pass record of finalized dates.

use std::collections::BTreeMap;

use super::forward;
use crate::graph::ScheduleGraph;
use crate::models::{DateSpan, ItemId};

/// Finalized spans for the current pass.
///
/// An item is finalized at most once; later reads see the finalized span
/// instead of the stored one.
#[derive(Debug, Clone, Default)]
pub struct Visited {
    finalized: BTreeMap<ItemId, DateSpan>,
}

impl Visited {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current span of an item: finalized if available, stored otherwise.
    ///
    /// `None` when the item is in neither.
    pub fn span_of(&self, graph: &ScheduleGraph, id: &ItemId) -> Option<DateSpan> {
        self.finalized
            .get(id)
            .copied()
            .or_else(|| graph.item(id).map(|item| item.span()))
    }

    /// Records the final span of an item.
    ///
    /// Returns `false` and keeps the first value if the item was already
    /// finalized.
    pub fn finalize(&mut self, id: ItemId, span: DateSpan) -> bool {
        if self.finalized.contains_key(&id) {
            return false;
        }
        self.finalized.insert(id, span);
        true
    }

    /// Days an item moved in this pass relative to its dates in `stored`,
    /// measured as [`forward::root_delta`] does.
    ///
    /// Zero for items not finalized yet or unknown to `stored`.
    pub fn moved_days(&self, stored: &ScheduleGraph, id: &ItemId) -> i64 {
        match (stored.item(id), self.finalized.get(id)) {
            (Some(item), Some(span)) => forward::root_delta(item.span(), *span),
            _ => 0,
        }
    }

    /// Whether the item was finalized in this pass.
    pub fn is_finalized(&self, id: &ItemId) -> bool {
        self.finalized.contains_key(id)
    }

    /// Number of finalized items.
    pub fn len(&self) -> usize {
        self.finalized.len()
    }

    /// Whether nothing was finalized.
    pub fn is_empty(&self) -> bool {
        self.finalized.is_empty()
    }

    /// Finalized items in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &DateSpan)> {
        self.finalized.iter()
    }
}
