//! Follows propagation for leaf items.
//!
//! # Rule
//!
//! With `min` the latest earliest-start across an item's effective
//! predecessors and `pull` from [`backward_pull`]:
//!
//! - no `min`: the item keeps its dates;
//! - no start: start becomes `min`, an existing due date is raised to `min`
//!   if it would otherwise precede the start;
//! - otherwise the span shifts by `max(min - start, pull)`. Shifting moves
//!   both ends, so the duration is preserved.
//!
//! `pull` comes from the predecessors that moved in this pass, so an item
//! whose predecessors all stayed put only moves to satisfy `min`. Forward
//! moves therefore only touch items without enough slack, and backward
//! moves never pull an item past a bound set by another predecessor.

use chrono::NaiveDate;

use crate::config::BackwardPolicy;
use crate::dates;
use crate::models::DateSpan;

/// Days the root moved, as seen by its successors.
///
/// Measured on the due date when it was set before and after, otherwise on
/// the start date, otherwise zero.
pub fn root_delta(before: DateSpan, after: DateSpan) -> i64 {
    match (before, after) {
        (
            DateSpan {
                due_date: Some(old), ..
            },
            DateSpan {
                due_date: Some(new), ..
            },
        ) => dates::days_between(old, new),
        (
            DateSpan {
                start_date: Some(old),
                ..
            },
            DateSpan {
                start_date: Some(new),
                ..
            },
        ) => dates::days_between(old, new),
        _ => 0,
    }
}

/// How far a leaf may be pulled earlier, given how far each of its
/// effective predecessors moved in this pass.
///
/// Under [`BackwardPolicy::Follow`] this is the largest backward move among
/// them, zero when none moved earlier. Under [`BackwardPolicy::Hold`] it is
/// always zero.
pub fn backward_pull<I>(predecessor_moves: I, policy: BackwardPolicy) -> i64
where
    I: IntoIterator<Item = i64>,
{
    match policy {
        BackwardPolicy::Follow => predecessor_moves.into_iter().min().unwrap_or(0).min(0),
        BackwardPolicy::Hold => 0,
    }
}

/// New span for a leaf item given its earliest allowed start.
pub fn reschedule(span: DateSpan, min_start: Option<NaiveDate>, pull: i64) -> DateSpan {
    let Some(min_start) = min_start else {
        return span;
    };

    match span.start_date {
        None => DateSpan::new(
            Some(min_start),
            span.due_date.map(|due| due.max(min_start)),
        ),
        Some(start) => {
            let required = dates::days_between(start, min_start);
            span.shifted(required.max(pull.min(0)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: i64) -> NaiveDate {
        dates::add_days(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), d)
    }

    fn span(s: i64, d: i64) -> DateSpan {
        DateSpan::bounded(day(s), day(d))
    }

    #[test]
    fn test_root_delta() {
        assert_eq!(root_delta(span(0, 0), span(0, 5)), 5);
        assert_eq!(root_delta(span(0, 0), span(0, -5)), -5);
        // due missing afterwards: fall back to start
        assert_eq!(
            root_delta(span(0, 3), DateSpan::new(Some(day(2)), None)),
            2
        );
        assert_eq!(root_delta(span(0, 0), DateSpan::undated()), 0);
        assert_eq!(
            root_delta(DateSpan::new(None, None), DateSpan::new(Some(day(3)), None)),
            0
        );
    }

    #[test]
    fn test_forward_without_slack() {
        // predecessor due 5, successor at 1..3
        let out = reschedule(span(1, 3), Some(day(6)), 0);
        assert_eq!(out, span(6, 8));
    }

    #[test]
    fn test_forward_partial_slack() {
        let out = reschedule(span(3, 5), Some(day(6)), 0);
        assert_eq!(out, span(6, 8));
    }

    #[test]
    fn test_forward_with_slack_untouched() {
        let out = reschedule(span(10, 12), Some(day(6)), 0);
        assert_eq!(out, span(10, 12));
    }

    #[test]
    fn test_backward_follows_pull() {
        let out = reschedule(span(1, 3), Some(day(-4)), -5);
        assert_eq!(out, span(-4, -2));

        // space between: moves by the pull, not to the bound
        let out = reschedule(span(3, 5), Some(day(-4)), -5);
        assert_eq!(out, span(-2, 0));
    }

    #[test]
    fn test_backward_bounded_by_other_predecessor() {
        let out = reschedule(span(1, 3), Some(day(0)), -5);
        assert_eq!(out, span(0, 2));
    }

    #[test]
    fn test_backward_pull() {
        assert_eq!(backward_pull([-5, 0, 2], BackwardPolicy::Follow), -5);
        assert_eq!(backward_pull([-2, -5], BackwardPolicy::Follow), -5);
        assert_eq!(backward_pull([3, 0], BackwardPolicy::Follow), 0);
        assert_eq!(backward_pull([], BackwardPolicy::Follow), 0);
        assert_eq!(backward_pull([-5], BackwardPolicy::Hold), 0);
    }

    #[test]
    fn test_backward_without_pull() {
        // predecessors unmoved: slack is kept
        let out = reschedule(span(10, 12), Some(day(4)), 0);
        assert_eq!(out, span(10, 12));
        let pull = backward_pull([-5], BackwardPolicy::Hold);
        assert_eq!(reschedule(span(1, 3), Some(day(-4)), pull), span(1, 3));
    }

    #[test]
    fn test_missing_start() {
        let open = DateSpan::new(None, Some(day(3)));
        assert_eq!(reschedule(open, Some(day(6)), 0), span(6, 6));
        assert_eq!(reschedule(open, Some(day(-4)), -5), span(-4, 3));
        assert_eq!(
            reschedule(DateSpan::undated(), Some(day(1)), 0),
            DateSpan::new(Some(day(1)), None)
        );
    }

    #[test]
    fn test_missing_due() {
        let open = DateSpan::new(Some(day(1)), None);
        assert_eq!(
            reschedule(open, Some(day(6)), 0),
            DateSpan::new(Some(day(6)), None)
        );
    }

    #[test]
    fn test_unconstrained() {
        assert_eq!(reschedule(span(1, 3), None, -5), span(1, 3));
    }
}
