//! Summary arithmetic over the night ledger.
//!
//! A "missing night" is a calendar date strictly inside the tracked range
//! with no record. With nights on the first and last date included in the
//! count, the gap count is `(last - first).days - count + 1`.

use crate::models::night::Night;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub missing: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSummary {
    pub count: i64,
    /// None when no night has been recorded yet.
    pub range: Option<TrackedRange>,
}

/// Summarize a day-ordered night list. An empty ledger is a valid state
/// and yields no range rather than a panic.
pub fn summarize(nights: &[Night]) -> LedgerSummary {
    let count = nights.len() as i64;

    let range = match (nights.first(), nights.last()) {
        (Some(first), Some(last)) => {
            let span = (last.day - first.day).num_days();
            Some(TrackedRange {
                first: first.day,
                last: last.day,
                missing: span - count + 1,
            })
        }
        _ => None,
    };

    LedgerSummary { count, range }
}
