//! Storage seam and snapshot materialization.
//!
//! Propagation never talks to storage mid-computation. The subgraph a pass
//! can touch is read once through [`ItemStore`] into a [`ScheduleGraph`],
//! and everything after that is in-memory.

use std::collections::BTreeMap;

use super::ScheduleGraph;
use crate::error::PropagationError;
use crate::models::{Attribute, FollowsRelation, Item, ItemId, RootChange};

/// Read access to stored items and relations.
///
/// Implemented by the persistence layer. [`ScheduleGraph`] implements it
/// too, so an in-memory graph can stand in for storage.
pub trait ItemStore {
    /// Loads an item by id.
    fn load_item(&self, id: &ItemId) -> Option<Item>;

    /// Relations in which `id` is the predecessor.
    fn load_successors(&self, id: &ItemId) -> Vec<FollowsRelation>;

    /// Relations in which `id` is the successor.
    fn load_predecessors(&self, id: &ItemId) -> Vec<FollowsRelation>;

    /// Ids of items directly contained in `id`.
    fn load_children(&self, id: &ItemId) -> Vec<ItemId>;
}

impl ItemStore for ScheduleGraph {
    fn load_item(&self, id: &ItemId) -> Option<Item> {
        self.item(id).cloned()
    }

    fn load_successors(&self, id: &ItemId) -> Vec<FollowsRelation> {
        self.successors(id).cloned().collect()
    }

    fn load_predecessors(&self, id: &ItemId) -> Vec<FollowsRelation> {
        self.predecessors(id).cloned().collect()
    }

    fn load_children(&self, id: &ItemId) -> Vec<ItemId> {
        self.children(id).cloned().collect()
    }
}

impl ScheduleGraph {
    /// Reads every item a change to `change.id` can affect or depend on.
    ///
    /// Loaded: the root, its followers (transitively), descendants of every
    /// follower, all ancestors with their children, the predecessors of
    /// every expanded item, and the chain of a newly assigned parent.
    pub fn materialize<S>(store: &S, change: &RootChange) -> Result<Self, PropagationError>
    where
        S: ItemStore + ?Sized,
    {
        let mut loader = Loader {
            store,
            graph: ScheduleGraph::new(),
            expanded: BTreeMap::new(),
        };

        if !loader.load(&change.id) {
            return Err(PropagationError::UnknownItem(change.id.clone()));
        }
        loader.expand(change.id.clone());
        if change.touches(Attribute::Parent) {
            if let Some(parent) = &change.parent {
                loader.expand(parent.clone());
            }
        }

        tracing::debug!(
            root = %change.id,
            items = loader.graph.len(),
            relations = loader.graph.relations().len(),
            "materialized snapshot"
        );
        Ok(loader.graph)
    }
}

struct Loader<'s, S: ?Sized> {
    store: &'s S,
    graph: ScheduleGraph,
    /// id → expanded as a scheduled item (descendants followed)
    expanded: BTreeMap<ItemId, bool>,
}

impl<S: ItemStore + ?Sized> Loader<'_, S> {
    /// Fetches an item once. Returns whether it exists.
    fn load(&mut self, id: &ItemId) -> bool {
        if self.graph.contains(id) {
            return true;
        }
        match self.store.load_item(id) {
            Some(item) => {
                self.graph.insert_item(item);
                true
            }
            None => false,
        }
    }

    fn expand(&mut self, start: ItemId) {
        let mut stack = vec![(start, false)];

        while let Some((id, scheduled)) = stack.pop() {
            match self.expanded.get(&id) {
                Some(true) => continue,
                Some(false) if !scheduled => continue,
                _ => {}
            }
            self.expanded.insert(id.clone(), scheduled);
            if !self.load(&id) {
                continue;
            }

            for rel in self.store.load_predecessors(&id) {
                self.load(&rel.predecessor);
                self.graph.add_follows(rel);
            }
            for rel in self.store.load_successors(&id) {
                stack.push((rel.successor.clone(), true));
                self.graph.add_follows(rel);
            }
            for child in self.store.load_children(&id) {
                self.load(&child);
                if scheduled {
                    stack.push((child, true));
                }
            }
            if let Some(parent) = self.graph.item(&id).and_then(|i| i.parent.clone()) {
                stack.push((parent, false));
            }
        }
    }
}
