//! Period-range compression and cycle-length estimation.
//!
//! # Responsibility
//! - Collapse sorted period days into inclusive ranges.
//! - Build the newest-first period history view.
//! - Estimate mean cycle length and the next expected start.
//!
//! # Invariants
//! - The trailing open range is always flushed.
//! - A cycle estimate needs at least two recorded period starts.

use crate::model::tracker::{MonthKey, PeriodLog};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive span of consecutive period days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: u32,
    pub end: u32,
}

/// One month of the period history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodMonth {
    pub key: MonthKey,
    pub label: String,
    pub ranges: Vec<DayRange>,
}

/// Compresses ascending, distinct days into inclusive ranges.
///
/// A new range starts whenever a day is not `previous + 1`.
pub fn compress_ranges<I>(days: I) -> Vec<DayRange>
where
    I: IntoIterator<Item = u32>,
{
    let mut ranges = Vec::new();
    let mut open: Option<DayRange> = None;

    for day in days {
        open = match open {
            Some(mut range) if range.end.checked_add(1) == Some(day) => {
                range.end = day;
                Some(range)
            }
            Some(range) => {
                ranges.push(range);
                Some(DayRange {
                    start: day,
                    end: day,
                })
            }
            None => Some(DayRange {
                start: day,
                end: day,
            }),
        };
    }

    if let Some(range) = open {
        ranges.push(range);
    }
    ranges
}

/// Months with recorded period days, newest first, with compressed ranges.
pub fn period_history(periods: &PeriodLog) -> Vec<PeriodMonth> {
    periods
        .iter()
        .rev()
        .filter(|(_, days)| !days.is_empty())
        .map(|(key, days)| PeriodMonth {
            key: *key,
            label: key.label(),
            ranges: compress_ranges(days.iter().copied()),
        })
        .collect()
}

/// Earliest marked day of every non-empty month, ascending.
///
/// Stored days past the month end roll into the next month.
pub fn period_starts(periods: &PeriodLog) -> Vec<NaiveDate> {
    let mut starts: Vec<NaiveDate> = periods
        .iter()
        .filter_map(|(key, days)| {
            let first = days.iter().next()?;
            key.rolling_date(*first)
        })
        .collect();
    starts.sort_unstable();
    starts
}

/// Mean days between consecutive period starts, rounded to nearest.
///
/// Returns `None` with fewer than two starts.
pub fn average_cycle_length(periods: &PeriodLog) -> Option<u32> {
    mean_gap_days(&period_starts(periods))
}

/// Mean gap in days between ascending dates, rounded to nearest.
pub fn mean_gap_days(starts: &[NaiveDate]) -> Option<u32> {
    if starts.len() < 2 {
        return None;
    }
    let total: i64 = starts
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .sum();
    let mean = total as f64 / (starts.len() - 1) as f64;
    Some(mean.round().max(0.0) as u32)
}

/// Last recorded start plus the estimated cycle length.
pub fn next_period_start(periods: &PeriodLog) -> Option<NaiveDate> {
    let starts = period_starts(periods);
    let cycle = mean_gap_days(&starts)?;
    let last = starts.last()?;
    last.checked_add_signed(Duration::days(i64::from(cycle)))
}
