//! Structural validation of schedule graphs.
//!
//! Propagation tolerates a broken graph (it reports and skips what it
//! cannot use). These checks are for callers that want to reject bad data
//! up front. Detects:
//! - Due dates before start dates
//! - Relations and parents pointing at missing items
//! - Self relations and relations between an item and its own ancestor
//! - Circular follows dependencies (DAG validation)
//! - Circular containment
//!
//! [`check_new_relation`] answers the narrower question asked before a
//! relation is created.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::graph::ScheduleGraph;
use crate::models::ItemId;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An item's due date precedes its start date.
    InvertedDates,
    /// A relation references an item that doesn't exist.
    DanglingRelation,
    /// An item references a parent that doesn't exist.
    DanglingParent,
    /// A relation links an item to itself.
    SelfRelation,
    /// A relation links an item to one of its ancestors or descendants.
    AncestorRelation,
    /// Follows graph contains a cycle.
    CyclicDependency,
    /// Parent chain loops back on itself.
    HierarchyCycle,
    /// The relation already exists.
    DuplicateRelation,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a whole graph.
///
/// Checks:
/// 1. No item is due before it starts
/// 2. Every relation endpoint exists
/// 3. Every parent exists
/// 4. No relation links an item to itself
/// 5. No relation links an item to its own ancestor
/// 6. No circular follows dependencies
/// 7. No circular containment
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_graph(graph: &ScheduleGraph) -> ValidationResult {
    let mut errors = Vec::new();

    for item in graph.items() {
        if let (Some(start), Some(due)) = (item.start_date, item.due_date) {
            if due < start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvertedDates,
                    format!("Item '{}' is due {due} before it starts {start}", item.id),
                ));
            }
        }

        if let Some(parent) = &item.parent {
            if !graph.contains(parent) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DanglingParent,
                    format!("Item '{}' references unknown parent '{parent}'", item.id),
                ));
            }
        }
    }

    for rel in graph.relations() {
        for endpoint in [&rel.predecessor, &rel.successor] {
            if !graph.contains(endpoint) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DanglingRelation,
                    format!(
                        "Relation '{}' -> '{}' references unknown item '{endpoint}'",
                        rel.predecessor, rel.successor
                    ),
                ));
            }
        }

        if rel.is_self_relation() {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfRelation,
                format!("Item '{}' follows itself", rel.predecessor),
            ));
        } else if related_by_containment(graph, &rel.predecessor, &rel.successor) {
            errors.push(ValidationError::new(
                ValidationErrorKind::AncestorRelation,
                format!(
                    "Relation '{}' -> '{}' links an item to its own ancestor",
                    rel.predecessor, rel.successor
                ),
            ));
        }
    }

    if let Some(cycle_err) = detect_cycles(graph) {
        errors.push(cycle_err);
    }
    errors.extend(detect_hierarchy_cycles(graph));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks whether `predecessor -> successor` may be added to `graph`.
///
/// Rejects self relations, duplicates, links between an item and its
/// ancestor, links to unknown items, and links that would close a cycle.
/// A cycle is closed when `predecessor` is already reachable from
/// `successor`, either directly or as a descendant of a reachable item
/// (children inherit their ancestors' relations).
pub fn check_new_relation(
    graph: &ScheduleGraph,
    predecessor: &ItemId,
    successor: &ItemId,
) -> ValidationResult {
    let mut errors = Vec::new();

    if predecessor == successor {
        errors.push(ValidationError::new(
            ValidationErrorKind::SelfRelation,
            format!("Item '{predecessor}' cannot follow itself"),
        ));
        return Err(errors);
    }

    for endpoint in [predecessor, successor] {
        if !graph.contains(endpoint) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingRelation,
                format!("Unknown item '{endpoint}'"),
            ));
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    if graph
        .successors(predecessor)
        .any(|rel| &rel.successor == successor)
    {
        errors.push(ValidationError::new(
            ValidationErrorKind::DuplicateRelation,
            format!("'{successor}' already follows '{predecessor}'"),
        ));
    }

    if related_by_containment(graph, predecessor, successor) {
        errors.push(ValidationError::new(
            ValidationErrorKind::AncestorRelation,
            format!("'{predecessor}' and '{successor}' are in the same parent chain"),
        ));
    } else if reachable_from(graph, successor).contains(predecessor) {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!("'{predecessor}' already depends on '{successor}'"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn related_by_containment(graph: &ScheduleGraph, a: &ItemId, b: &ItemId) -> bool {
    graph.is_ancestor_of(a, b) || graph.is_ancestor_of(b, a)
}

/// Items whose dates depend on `start`: followers, transitively, and every
/// descendant of a follower.
fn reachable_from(graph: &ScheduleGraph, start: &ItemId) -> HashSet<ItemId> {
    let mut seen = HashSet::new();
    let mut stack = vec![start.clone()];

    while let Some(id) = stack.pop() {
        if !seen.insert(id.clone()) {
            continue;
        }
        stack.extend(graph.successors(&id).map(|rel| rel.successor.clone()));
        stack.extend(graph.children(&id).cloned());
    }

    seen
}

/// Detects cycles in the follows graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(graph: &ScheduleGraph) -> Option<ValidationError> {
    // Build adjacency list: predecessor → successors
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for rel in graph.relations() {
        adj.entry(rel.predecessor.as_str())
            .or_default()
            .push(rel.successor.as_str());
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for item in graph.items() {
        let node = item.id.as_str();
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving item '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}

/// One error per containment loop, named after its smallest member.
fn detect_hierarchy_cycles(graph: &ScheduleGraph) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for item in graph.items() {
        let mut seen = HashSet::new();
        let mut current = item.parent.as_ref();
        let mut on_loop = false;

        while let Some(parent) = current {
            if parent == &item.id {
                on_loop = true;
                break;
            }
            if !seen.insert(parent) {
                break;
            }
            current = graph.item(parent).and_then(|p| p.parent.as_ref());
        }

        // Members of the loop are exactly the ids seen on the way back.
        if on_loop && seen.iter().all(|other| item.id <= **other) {
            errors.push(ValidationError::new(
                ValidationErrorKind::HierarchyCycle,
                format!("Item '{}' is its own ancestor", item.id),
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FollowsRelation, Item};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    fn sample_graph() -> ScheduleGraph {
        let mut g = ScheduleGraph::new();
        g.insert_item(Item::new("phase").with_dates(day(1), day(20)));
        g.insert_item(Item::new("dig").with_dates(day(1), day(5)).with_parent("phase"));
        g.insert_item(Item::new("pour").with_dates(day(6), day(9)).with_parent("phase"));
        g.insert_item(Item::new("cure").with_dates(day(12), day(20)).with_parent("phase"));
        g.add_follows(FollowsRelation::new("dig", "pour"));
        g.add_follows(FollowsRelation::new("pour", "cure").with_delay(2));
        g
    }

    #[test]
    fn test_valid_graph() {
        assert!(validate_graph(&sample_graph()).is_ok());
    }

    #[test]
    fn test_inverted_dates() {
        let mut g = sample_graph();
        g.insert_item(Item::new("odd").with_dates(day(9), day(3)));
        assert_eq!(kinds(validate_graph(&g)), vec![ValidationErrorKind::InvertedDates]);
    }

    #[test]
    fn test_dangling_references() {
        let mut g = sample_graph();
        g.insert_item(Item::new("orphan").with_parent("gone"));
        g.add_follows(FollowsRelation::new("cure", "deleted"));

        let kinds = kinds(validate_graph(&g));
        assert!(kinds.contains(&ValidationErrorKind::DanglingParent));
        assert!(kinds.contains(&ValidationErrorKind::DanglingRelation));
    }

    #[test]
    fn test_self_and_ancestor_relations() {
        let mut g = sample_graph();
        g.add_follows(FollowsRelation::new("dig", "dig"));
        g.add_follows(FollowsRelation::new("phase", "cure"));

        let kinds = kinds(validate_graph(&g));
        assert!(kinds.contains(&ValidationErrorKind::SelfRelation));
        assert!(kinds.contains(&ValidationErrorKind::AncestorRelation));
    }

    #[test]
    fn test_cyclic_dependency() {
        // dig → pour → cure → dig
        let mut g = sample_graph();
        g.add_follows(FollowsRelation::new("cure", "dig"));
        assert_eq!(
            kinds(validate_graph(&g)),
            vec![ValidationErrorKind::CyclicDependency]
        );
    }

    #[test]
    fn test_hierarchy_cycle_reported_once() {
        let mut g = ScheduleGraph::new();
        g.insert_item(Item::new("a").with_parent("c"));
        g.insert_item(Item::new("b").with_parent("a"));
        g.insert_item(Item::new("c").with_parent("b"));
        g.insert_item(Item::new("hanger").with_parent("a"));

        let errors = validate_graph(&g).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::HierarchyCycle);
        assert!(errors[0].message.contains("'a'"));
    }

    #[test]
    fn test_multiple_errors() {
        let mut g = sample_graph();
        g.insert_item(Item::new("odd").with_dates(day(9), day(3)).with_parent("gone"));
        assert!(validate_graph(&g).unwrap_err().len() >= 2);
    }

    #[test]
    fn test_new_relation_accepted() {
        let g = sample_graph();
        assert!(check_new_relation(&g, &id("dig"), &id("cure")).is_ok());
    }

    #[test]
    fn test_new_relation_self() {
        let g = sample_graph();
        assert_eq!(
            kinds(check_new_relation(&g, &id("dig"), &id("dig"))),
            vec![ValidationErrorKind::SelfRelation]
        );
    }

    #[test]
    fn test_new_relation_unknown_item() {
        let g = sample_graph();
        assert_eq!(
            kinds(check_new_relation(&g, &id("dig"), &id("nowhere"))),
            vec![ValidationErrorKind::DanglingRelation]
        );
    }

    #[test]
    fn test_new_relation_duplicate() {
        let g = sample_graph();
        assert_eq!(
            kinds(check_new_relation(&g, &id("dig"), &id("pour"))),
            vec![ValidationErrorKind::DuplicateRelation]
        );
    }

    #[test]
    fn test_new_relation_would_close_cycle() {
        let g = sample_graph();
        assert_eq!(
            kinds(check_new_relation(&g, &id("cure"), &id("dig"))),
            vec![ValidationErrorKind::CyclicDependency]
        );
    }

    #[test]
    fn test_new_relation_cycle_through_inherited_relation() {
        // "later" follows "block"; "inner" sits inside "later" and so
        // inherits the relation. Making "block" follow "inner" loops.
        let mut g = ScheduleGraph::new();
        g.insert_item(Item::new("block"));
        g.insert_item(Item::new("later"));
        g.insert_item(Item::new("inner").with_parent("later"));
        g.add_follows(FollowsRelation::new("block", "later"));

        assert_eq!(
            kinds(check_new_relation(&g, &id("inner"), &id("block"))),
            vec![ValidationErrorKind::CyclicDependency]
        );
    }

    #[test]
    fn test_new_relation_to_ancestor() {
        let g = sample_graph();
        assert_eq!(
            kinds(check_new_relation(&g, &id("phase"), &id("pour"))),
            vec![ValidationErrorKind::AncestorRelation]
        );
        assert_eq!(
            kinds(check_new_relation(&g, &id("pour"), &id("phase"))),
            vec![ValidationErrorKind::AncestorRelation]
        );
    }
}
