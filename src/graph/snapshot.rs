//! In-memory snapshot of items and their relations.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{DateSpan, FollowsRelation, Item, ItemId};

/// Items, follows relations and containment, indexed for traversal.
///
/// Relations may reference items that are not in the snapshot (stale
/// links); traversal reports those instead of failing.
#[derive(Debug, Clone, Default)]
pub struct ScheduleGraph {
    items: BTreeMap<ItemId, Item>,
    relations: Vec<FollowsRelation>,
    /// predecessor → relation indices
    outgoing: BTreeMap<ItemId, Vec<usize>>,
    /// successor → relation indices
    incoming: BTreeMap<ItemId, Vec<usize>>,
    /// parent → children
    children: BTreeMap<ItemId, BTreeSet<ItemId>>,
}

impl ScheduleGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an item, keeping the containment index current.
    pub fn insert_item(&mut self, item: Item) {
        if let Some(old_parent) = self.items.get(&item.id).and_then(|old| old.parent.clone()) {
            if let Some(siblings) = self.children.get_mut(&old_parent) {
                siblings.remove(&item.id);
            }
        }
        if let Some(parent) = &item.parent {
            self.children
                .entry(parent.clone())
                .or_default()
                .insert(item.id.clone());
        }
        self.items.insert(item.id.clone(), item);
    }

    /// Adds a follows relation. Exact duplicates are ignored.
    pub fn add_follows(&mut self, relation: FollowsRelation) {
        if self.relations.contains(&relation) {
            return;
        }
        let idx = self.relations.len();
        self.outgoing
            .entry(relation.predecessor.clone())
            .or_default()
            .push(idx);
        self.incoming
            .entry(relation.successor.clone())
            .or_default()
            .push(idx);
        self.relations.push(relation);
    }

    /// Moves an item under a new parent (or to the top level).
    ///
    /// Returns `false` if the item is unknown.
    pub fn set_parent(&mut self, id: &ItemId, parent: Option<ItemId>) -> bool {
        match self.items.get(id) {
            Some(item) => {
                let mut item = item.clone();
                item.parent = parent;
                self.insert_item(item);
                true
            }
            None => false,
        }
    }

    /// Overwrites an item's dates. Returns `false` if the item is unknown.
    pub fn set_span(&mut self, id: &ItemId, span: DateSpan) -> bool {
        match self.items.get_mut(id) {
            Some(item) => {
                item.set_span(span);
                true
            }
            None => false,
        }
    }

    /// Looks up an item.
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Whether the item is part of the snapshot.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// All items in id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// All follows relations in insertion order.
    pub fn relations(&self) -> &[FollowsRelation] {
        &self.relations
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the graph holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Relations in which `id` is the predecessor.
    pub fn successors<'a>(&'a self, id: &ItemId) -> impl Iterator<Item = &'a FollowsRelation> + 'a {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.relations[idx])
    }

    /// Relations in which `id` is the successor.
    pub fn predecessors<'a>(&'a self, id: &ItemId) -> impl Iterator<Item = &'a FollowsRelation> + 'a {
        self.incoming
            .get(id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.relations[idx])
    }

    /// Direct children of `id`, in id order.
    pub fn children<'a>(&'a self, id: &ItemId) -> impl Iterator<Item = &'a ItemId> + 'a {
        self.children.get(id).into_iter().flatten()
    }

    /// Whether `id` contains at least one item.
    pub fn has_children(&self, id: &ItemId) -> bool {
        self.children.get(id).is_some_and(|c| !c.is_empty())
    }

    /// Parent chain of `id`, nearest first.
    ///
    /// Stops at the first parent missing from the snapshot and at any
    /// containment loop.
    pub fn ancestors(&self, id: &ItemId) -> Vec<ItemId> {
        let mut chain = Vec::new();
        let mut seen = BTreeSet::from([id.clone()]);
        let mut current = self.items.get(id).and_then(|i| i.parent.as_ref());

        while let Some(parent) = current {
            if !seen.insert(parent.clone()) || !self.items.contains_key(parent) {
                break;
            }
            chain.push(parent.clone());
            current = self.items.get(parent).and_then(|i| i.parent.as_ref());
        }
        chain
    }

    /// Whether `ancestor` contains `id`, directly or transitively.
    pub fn is_ancestor_of(&self, ancestor: &ItemId, id: &ItemId) -> bool {
        self.ancestors(id).contains(ancestor)
    }

    /// Follows relations constraining `id`: its own and those inherited
    /// from every ancestor.
    pub fn effective_predecessors(&self, id: &ItemId) -> Vec<&FollowsRelation> {
        let mut relations: Vec<&FollowsRelation> = self.predecessors(id).collect();
        for ancestor in self.ancestors(id) {
            relations.extend(self.predecessors(&ancestor));
        }
        relations
    }

    /// Earliest start `id` may have given its effective predecessors, with
    /// predecessor dates supplied by `predecessor_span`.
    ///
    /// Predecessors for which `predecessor_span` returns `None`, or that
    /// have no due date, impose nothing.
    pub fn soonest_start_by<F>(&self, id: &ItemId, mut predecessor_span: F) -> Option<NaiveDate>
    where
        F: FnMut(&FollowsRelation) -> Option<DateSpan>,
    {
        self.effective_predecessors(id)
            .into_iter()
            .filter_map(|rel| predecessor_span(rel).and_then(|span| rel.earliest_start(span.due_date)))
            .max()
    }

    /// Earliest start `id` may have given the stored predecessor dates.
    pub fn soonest_start(&self, id: &ItemId) -> Option<NaiveDate> {
        self.soonest_start_by(id, |rel| self.item(&rel.predecessor).map(Item::span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    fn family() -> ScheduleGraph {
        let mut g = ScheduleGraph::new();
        g.insert_item(Item::new("root"));
        g.insert_item(Item::new("mid").with_parent("root"));
        g.insert_item(Item::new("leaf1").with_parent("mid"));
        g.insert_item(Item::new("leaf2").with_parent("mid"));
        g
    }

    #[test]
    fn test_containment_index() {
        let g = family();
        let kids: Vec<_> = g.children(&id("mid")).cloned().collect();
        assert_eq!(kids, vec![id("leaf1"), id("leaf2")]);
        assert!(g.has_children(&id("root")));
        assert!(!g.has_children(&id("leaf1")));
    }

    #[test]
    fn test_ancestors() {
        let g = family();
        assert_eq!(g.ancestors(&id("leaf1")), vec![id("mid"), id("root")]);
        assert!(g.ancestors(&id("root")).is_empty());
        assert!(g.is_ancestor_of(&id("root"), &id("leaf2")));
        assert!(!g.is_ancestor_of(&id("leaf2"), &id("root")));
    }

    #[test]
    fn test_reparent_updates_index() {
        let mut g = family();
        assert!(g.set_parent(&id("leaf2"), Some(id("root"))));

        let mid_kids: Vec<_> = g.children(&id("mid")).cloned().collect();
        assert_eq!(mid_kids, vec![id("leaf1")]);
        assert!(g.children(&id("root")).any(|c| c == &id("leaf2")));
        assert!(!g.set_parent(&id("ghost"), None));
    }

    #[test]
    fn test_ancestors_stop_on_loop() {
        let mut g = ScheduleGraph::new();
        g.insert_item(Item::new("a").with_parent("b"));
        g.insert_item(Item::new("b").with_parent("a"));
        assert_eq!(g.ancestors(&id("a")), vec![id("b")]);
    }

    #[test]
    fn test_duplicate_relations_ignored() {
        let mut g = ScheduleGraph::new();
        g.add_follows(FollowsRelation::new("a", "b"));
        g.add_follows(FollowsRelation::new("a", "b"));
        g.add_follows(FollowsRelation::new("a", "b").with_delay(2));
        assert_eq!(g.relations().len(), 2);
        assert_eq!(g.successors(&id("a")).count(), 2);
        assert_eq!(g.predecessors(&id("b")).count(), 2);
    }

    #[test]
    fn test_effective_predecessors_inherit() {
        let mut g = family();
        g.insert_item(Item::new("gate").with_dates(day(1), day(4)));
        g.insert_item(Item::new("review").with_dates(day(1), day(2)));
        g.add_follows(FollowsRelation::new("gate", "root").with_delay(1));
        g.add_follows(FollowsRelation::new("review", "leaf1"));

        let preds: Vec<_> = g
            .effective_predecessors(&id("leaf1"))
            .iter()
            .map(|r| r.predecessor.clone())
            .collect();
        assert_eq!(preds, vec![id("review"), id("gate")]);

        // gate due 4 + delay 1 + 1 = 6 beats review due 2 + 1 = 3
        assert_eq!(g.soonest_start(&id("leaf1")), Some(day(6)));
        assert_eq!(g.soonest_start(&id("leaf2")), Some(day(6)));
        assert_eq!(g.soonest_start(&id("gate")), None);
    }

    #[test]
    fn test_soonest_start_skips_undated_and_missing() {
        let mut g = ScheduleGraph::new();
        g.insert_item(Item::new("a"));
        g.insert_item(Item::new("b"));
        g.add_follows(FollowsRelation::new("a", "b"));
        g.add_follows(FollowsRelation::new("ghost", "b"));
        assert_eq!(g.soonest_start(&id("b")), None);
    }
}
