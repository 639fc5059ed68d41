//! Propagation engine.
//!
//! One pass takes a snapshot and a root change and returns the dates every
//! affected item must move to:
//!
//! 1. validate the change against the snapshot;
//! 2. apply it to a working copy (seeding an undated root from a new
//!    parent's bound);
//! 3. plan the affected set and its order ([`builder::plan`]);
//! 4. compute each item once, leaves through the forward rule and parents
//!    through the children envelope;
//! 5. diff against stored dates.

use tracing::{debug, trace, warn};

use super::forward;
use super::reconcile;
use super::visited::Visited;
use crate::config::PropagationConfig;
use crate::error::{GraphIssue, PropagationError};
use crate::graph::builder::{self, Role};
use crate::graph::{ItemStore, ScheduleGraph};
use crate::models::{Attribute, Item, PropagationResult, RootChange, ScheduledDates};

/// Computes date updates after a change to one item.
///
/// The engine is stateless apart from its configuration; every pass works
/// on its own copy of the snapshot.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use u_reschedule::graph::ScheduleGraph;
/// use u_reschedule::models::{FollowsRelation, Item, RootChange};
/// use u_reschedule::{BackwardPolicy, PropagationConfig, PropagationEngine};
///
/// let day = |d: u32| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
/// let mut graph = ScheduleGraph::new();
/// graph.insert_item(Item::new("pour").with_dates(day(1), day(10)));
/// graph.insert_item(Item::new("frame").with_dates(day(11), day(20)));
/// graph.add_follows(FollowsRelation::new("pour", "frame"));
///
/// let engine = PropagationEngine::with_config(
///     PropagationConfig::new().with_backward_policy(BackwardPolicy::Hold),
/// );
/// let change = RootChange::new("pour").with_due_date(Some(day(5)));
/// let result = engine.propagate(&graph, &change).unwrap();
/// assert!(result.is_empty());
/// assert_eq!(result.delta_days, -5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropagationEngine {
    config: PropagationConfig,
}

impl PropagationEngine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given configuration.
    pub fn with_config(config: PropagationConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    /// Reads the reachable subgraph from `store`, then propagates.
    pub fn propagate_from_store<S>(
        &self,
        store: &S,
        change: &RootChange,
    ) -> Result<PropagationResult, PropagationError>
    where
        S: ItemStore + ?Sized,
    {
        if change.id.is_empty() {
            return Err(PropagationError::EmptyRootId);
        }
        let graph = ScheduleGraph::materialize(store, change)?;
        self.propagate(&graph, change)
    }

    /// Propagates `change` through `graph`.
    ///
    /// The result holds only items whose dates differ from the stored ones.
    /// The root is included only when the pass altered the dates the caller
    /// proposed for it.
    pub fn propagate(
        &self,
        graph: &ScheduleGraph,
        change: &RootChange,
    ) -> Result<PropagationResult, PropagationError> {
        let stored = validate_root(graph, change)?;
        let mut root = change.apply_to(stored);
        if change.touches(Attribute::Parent) {
            validate_parent(graph, &root)?;
        }

        let mut result = PropagationResult::new();
        if change.attributes.is_empty() {
            debug!(root = %root.id, "no attributes changed");
            return Ok(result);
        }

        let proposed = root.span();
        let former_parent = match (&stored.parent, change.touches(Attribute::Parent)) {
            (Some(old), true) if root.parent.as_ref() != Some(old) => Some(old.clone()),
            _ => None,
        };

        let mut working = graph.clone();
        working.insert_item(root.clone());
        if change.touches(Attribute::Parent) {
            if let Some(parent) = root.parent.clone() {
                let soonest = working.soonest_start(&parent);
                if reconcile::adopt_parent_start(&mut root, soonest) {
                    debug!(root = %root.id, parent = %parent, start = ?root.start_date, "adopted parent start");
                    working.insert_item(root.clone());
                }
            }
        }

        let delta = forward::root_delta(stored.span(), root.span());
        let plan = builder::plan(&working, &root.id, former_parent.as_ref());
        debug!(
            root = %root.id,
            delta,
            affected = plan.affected_count(),
            "planned propagation"
        );

        for issue in &plan.issues {
            report(&mut result, issue.clone());
        }
        if !plan.cyclic.is_empty() {
            report(
                &mut result,
                GraphIssue::Cycle {
                    items: plan.cyclic.clone(),
                },
            );
        }

        let mut visited = Visited::new();
        visited.finalize(root.id.clone(), root.span());

        for id in &plan.order {
            let Some(item) = working.item(id) else {
                continue;
            };
            let current = visited.span_of(&working, id).unwrap_or_else(|| item.span());

            let mut dangling = Vec::new();
            let soonest = working.soonest_start_by(id, |rel| {
                let span = visited.span_of(&working, &rel.predecessor);
                if span.is_none() {
                    dangling.push(GraphIssue::DanglingRelation {
                        predecessor: rel.predecessor.clone(),
                        successor: rel.successor.clone(),
                    });
                }
                span
            });
            for issue in dangling {
                report(&mut result, issue);
            }

            let span = if working.has_children(id) {
                let children = working
                    .children(id)
                    .filter_map(|child| visited.span_of(&working, child));
                reconcile::floor_envelope(reconcile::envelope(children), soonest)
            } else if plan.role(id) == Some(Role::Follower) {
                let moves = working
                    .effective_predecessors(id)
                    .into_iter()
                    .map(|rel| visited.moved_days(graph, &rel.predecessor));
                let pull = forward::backward_pull(moves, self.config.backward_policy);
                forward::reschedule(current, soonest, pull)
            } else {
                current
            };

            trace!(item = %id, ?soonest, ?current, ?span, "computed");
            visited.finalize(id.clone(), span);
        }

        for (id, span) in visited.iter() {
            let before = if *id == root.id {
                proposed
            } else {
                match graph.item(id) {
                    Some(item) => item.span(),
                    None => continue,
                }
            };
            if *span != before {
                result.insert(
                    id.clone(),
                    ScheduledDates::from_span(*span, self.config.placeholder_duration_days),
                );
            }
        }
        result.delta_days = delta;

        debug!(
            root = %root.id,
            changed = result.len(),
            issues = result.issues.len(),
            "propagation finished"
        );
        Ok(result)
    }
}

fn validate_root<'g>(graph: &'g ScheduleGraph, change: &RootChange) -> Result<&'g Item, PropagationError> {
    if change.id.is_empty() {
        return Err(PropagationError::EmptyRootId);
    }
    graph
        .item(&change.id)
        .ok_or_else(|| PropagationError::UnknownItem(change.id.clone()))
}

fn validate_parent(graph: &ScheduleGraph, root: &Item) -> Result<(), PropagationError> {
    let Some(parent) = &root.parent else {
        return Ok(());
    };
    let invalid = || PropagationError::InvalidParent {
        item: root.id.clone(),
        parent: parent.clone(),
    };
    if *parent == root.id {
        return Err(invalid());
    }
    if !graph.contains(parent) {
        return Err(PropagationError::UnknownParent {
            item: root.id.clone(),
            parent: parent.clone(),
        });
    }
    if graph.is_ancestor_of(&root.id, parent) {
        return Err(invalid());
    }
    Ok(())
}

fn report(result: &mut PropagationResult, issue: GraphIssue) {
    if !result.issues.contains(&issue) {
        warn!(%issue, "skipping graph inconsistency");
        result.add_issue(issue);
    }
}
