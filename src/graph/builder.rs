//! Affected-set collection and scheduling order.
//!
//! # Algorithm
//!
//! 1. Starting at the root, walk outgoing follows edges (followers), the
//!    parent chain (ancestors) and, for every item reached as a follower,
//!    its whole subtree. Children inherit their ancestors' follows
//!    relations, so a moved follower drags its subtree along.
//! 2. Order the affected items with Kahn's algorithm. An item waits for its
//!    effective predecessors; a parent additionally waits for its children
//!    (its span is their envelope). Ties are broken by id, so the order is
//!    deterministic for a given snapshot.
//!
//! Items still waiting once the queue drains sit on a follows cycle.
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks"

use std::collections::{BTreeMap, BTreeSet};

use super::ScheduleGraph;
use crate::error::GraphIssue;
use crate::models::ItemId;

/// How an item entered the affected set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    /// Reached only through a parent pointer; its span is recomputed from
    /// its children.
    Ancestor,
    /// Reached through a follows edge or as a follower's descendant; its
    /// dates answer to its (inherited) predecessors.
    Follower,
}

/// Items touched by a change, with the order to compute them in.
#[derive(Debug, Clone, Default)]
pub struct SchedulePlan {
    /// Affected items (the root excluded) and their roles.
    pub roles: BTreeMap<ItemId, Role>,
    /// Computation order: dependencies first.
    pub order: Vec<ItemId>,
    /// Affected items left out of `order` because they sit on a cycle.
    pub cyclic: Vec<ItemId>,
    /// Dangling edges met while collecting.
    pub issues: Vec<GraphIssue>,
}

impl SchedulePlan {
    /// Role of an affected item.
    pub fn role(&self, id: &ItemId) -> Option<Role> {
        self.roles.get(id).copied()
    }

    /// Number of affected items.
    pub fn affected_count(&self) -> usize {
        self.roles.len()
    }
}

/// Builds the plan for a change rooted at `root`.
///
/// `former_parent` is the root's parent before a reparenting; its chain is
/// affected because its envelope loses a child.
pub fn plan(graph: &ScheduleGraph, root: &ItemId, former_parent: Option<&ItemId>) -> SchedulePlan {
    let mut plan = SchedulePlan::default();
    collect(graph, root, former_parent, &mut plan);
    order(graph, root, &mut plan);
    plan
}

fn collect(
    graph: &ScheduleGraph,
    root: &ItemId,
    former_parent: Option<&ItemId>,
    plan: &mut SchedulePlan,
) {
    let mut stack: Vec<(ItemId, Role)> = vec![(root.clone(), Role::Ancestor)];
    if let Some(former) = former_parent.filter(|f| graph.contains(f)) {
        stack.push((former.clone(), Role::Ancestor));
    }

    let mut root_expanded = false;

    while let Some((id, role)) = stack.pop() {
        if &id == root {
            if root_expanded {
                continue;
            }
            root_expanded = true;
        } else {
            // Follower outranks Ancestor; re-expand on upgrade only.
            match plan.roles.get(&id) {
                Some(&known) if known >= role => continue,
                _ => {
                    plan.roles.insert(id.clone(), role);
                }
            }
        }
        let role = if &id == root { Role::Ancestor } else { role };

        for rel in graph.successors(&id) {
            if graph.contains(&rel.successor) {
                stack.push((rel.successor.clone(), Role::Follower));
            } else {
                plan.issues.push(GraphIssue::DanglingRelation {
                    predecessor: rel.predecessor.clone(),
                    successor: rel.successor.clone(),
                });
            }
        }

        if role == Role::Follower {
            stack.extend(
                graph
                    .children(&id)
                    .filter(|child| *child != root)
                    .map(|child| (child.clone(), Role::Follower)),
            );
        }

        if let Some(parent) = graph.item(&id).and_then(|i| i.parent.as_ref()) {
            if graph.contains(parent) {
                stack.push((parent.clone(), Role::Ancestor));
            } else {
                plan.issues.push(GraphIssue::DanglingParent {
                    item: id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }
}

fn order(graph: &ScheduleGraph, root: &ItemId, plan: &mut SchedulePlan) {
    let mut indegree: BTreeMap<&ItemId, usize> = plan.roles.keys().map(|id| (id, 0)).collect();
    let mut dependents: BTreeMap<&ItemId, BTreeSet<&ItemId>> = BTreeMap::new();

    for id in plan.roles.keys() {
        let mut deps: BTreeSet<&ItemId> = graph
            .effective_predecessors(id)
            .into_iter()
            .map(|rel| &rel.predecessor)
            .collect();
        deps.extend(graph.children(id));

        for dep in deps {
            if dep == root || dep == id || !plan.roles.contains_key(dep) {
                continue;
            }
            if dependents.entry(dep).or_default().insert(id) {
                *indegree.entry(id).or_default() += 1;
            }
        }
    }

    let mut ready: BTreeSet<&ItemId> = indegree
        .iter()
        .filter(|&(_, &n)| n == 0)
        .map(|(&id, _)| id)
        .collect();

    while let Some(next) = ready.pop_first() {
        plan.order.push(next.clone());
        for &dependent in dependents.get(next).into_iter().flatten() {
            if let Some(n) = indegree.get_mut(dependent) {
                *n -= 1;
                if *n == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    if plan.order.len() < plan.roles.len() {
        let done: BTreeSet<&ItemId> = plan.order.iter().collect();
        plan.cyclic = plan
            .roles
            .keys()
            .filter(|id| !done.contains(id))
            .cloned()
            .collect();
    }
}
