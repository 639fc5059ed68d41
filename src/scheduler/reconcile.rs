//! Parent/child reconciliation.
//!
//! A parent's span is the envelope of its children's spans, floored by the
//! parent's own soonest start. A newly attached, unscheduled child is
//! seeded from its new parent's soonest start.

use chrono::NaiveDate;

use crate::dates;
use crate::models::{DateSpan, Item};

/// Tightest span containing every given span.
///
/// Start is the earliest present start, due the latest present due; an end
/// no child sets stays unset.
pub fn envelope<I>(spans: I) -> DateSpan
where
    I: IntoIterator<Item = DateSpan>,
{
    spans
        .into_iter()
        .fold(DateSpan::undated(), |acc, span| DateSpan {
            start_date: dates::earliest(acc.start_date, span.start_date),
            due_date: dates::latest(acc.due_date, span.due_date),
        })
}

/// Applies the parent's own precedence bound to a children envelope.
///
/// The start never precedes `soonest`; if that pushes it past the due
/// date, the due date follows.
pub fn floor_envelope(envelope: DateSpan, soonest: Option<NaiveDate>) -> DateSpan {
    let start_date = match (envelope.start_date, soonest) {
        (Some(start), Some(soonest)) => Some(start.max(soonest)),
        (start, _) => start,
    };
    let due_date = match (start_date, envelope.due_date) {
        (Some(start), Some(due)) if due < start => Some(start),
        (_, due) => due,
    };
    DateSpan {
        start_date,
        due_date,
    }
}

/// Seeds an item without a start date from its new parent's soonest start.
///
/// Items that already have a start keep their dates even when they violate
/// the parent's bound; flagging that is left to validation. Returns
/// whether the item changed.
pub fn adopt_parent_start(item: &mut Item, parent_soonest: Option<NaiveDate>) -> bool {
    match (item.start_date, parent_soonest) {
        (None, Some(soonest)) => {
            item.start_date = Some(soonest);
            true
        }
        _ => false,
    }
}
