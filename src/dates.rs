//! Day arithmetic on optional calendar dates.
//!
//! All scheduling happens at day granularity. Dates are optional
//! everywhere: an absent date is a valid state, never an error, so every
//! function here is total.
//!
//! # Conventions
//!
//! - Spans are inclusive: an item starting and ending on the same day lasts
//!   one day.
//! - A follows relation with delay `d` requires the successor to start no
//!   earlier than `predecessor.due + d + 1`.

use chrono::{NaiveDate, TimeDelta};

/// Duration reported for items that lack a start or a due date.
///
/// Placeholder until durations can be set independently of the dates.
pub const PLACEHOLDER_DURATION_DAYS: i64 = 1;

/// Adds (or subtracts) whole days, saturating at the representable range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

/// Signed number of days from `from` to `to`.
#[inline]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Inclusive duration of a span in days.
///
/// Falls back to `placeholder_days` when either end is missing.
pub fn duration_days(
    start: Option<NaiveDate>,
    due: Option<NaiveDate>,
    placeholder_days: i64,
) -> i64 {
    match (start, due) {
        (Some(start), Some(due)) => days_between(start, due) + 1,
        _ => placeholder_days,
    }
}

/// Earliest start a successor may have given its predecessor's due date.
///
/// `None` when the predecessor has no due date: the edge imposes nothing.
pub fn earliest_successor_start(predecessor_due: Option<NaiveDate>, delay: u32) -> Option<NaiveDate> {
    predecessor_due.map(|due| add_days(due, i64::from(delay) + 1))
}

/// Later of two optional dates; an absent date never wins.
pub fn latest(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Earlier of two optional dates; an absent date never wins.
pub fn earliest(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_add_days() {
        assert_eq!(add_days(day(10), 5), day(15));
        assert_eq!(add_days(day(10), -9), day(1));
        assert_eq!(add_days(day(31), 1), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn test_add_days_saturates() {
        assert_eq!(add_days(NaiveDate::MAX, 1), NaiveDate::MAX);
        assert_eq!(add_days(NaiveDate::MIN, -1), NaiveDate::MIN);
        assert_eq!(add_days(day(1), i64::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_duration_inclusive() {
        assert_eq!(duration_days(Some(day(1)), Some(day(3)), 1), 3);
        assert_eq!(duration_days(Some(day(4)), Some(day(4)), 1), 1);
    }

    #[test]
    fn test_duration_placeholder() {
        assert_eq!(duration_days(None, Some(day(3)), PLACEHOLDER_DURATION_DAYS), 1);
        assert_eq!(duration_days(Some(day(3)), None, 7), 7);
        assert_eq!(duration_days(None, None, PLACEHOLDER_DURATION_DAYS), 1);
    }

    #[test]
    fn test_earliest_successor_start() {
        assert_eq!(earliest_successor_start(Some(day(5)), 0), Some(day(6)));
        assert_eq!(earliest_successor_start(Some(day(5)), 3), Some(day(9)));
        assert_eq!(earliest_successor_start(None, 3), None);
    }

    #[test]
    fn test_latest_and_earliest() {
        assert_eq!(latest(Some(day(2)), Some(day(5))), Some(day(5)));
        assert_eq!(latest(None, Some(day(5))), Some(day(5)));
        assert_eq!(latest(None, None), None);
        assert_eq!(earliest(Some(day(2)), Some(day(5))), Some(day(2)));
        assert_eq!(earliest(Some(day(2)), None), Some(day(2)));
    }
}
