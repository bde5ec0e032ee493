//! Mood and menstrual-cycle tracker records.
//!
//! # Responsibility
//! - Define month-keyed period and mood records.
//! - Define the user-editable mood palette.
//!
//! # Invariants
//! - `MonthKey` uses a zero-based month index and serializes as `"{year}-{index}"`.
//! - Mood records reference palette entries by color value, not by position.
//! - Palette colors are hex strings (`#RGB` or `#RRGGBB`).

use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static MONTH_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d{1,6})-(\d{1,2})$").expect("valid month key regex"));
static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

/// Trims `color` and accepts only `#RGB` / `#RRGGBB` hex.
pub fn check_color(color: &str) -> Result<&str, TrackerValidationError> {
    let color = color.trim();
    if !HEX_COLOR_RE.is_match(color) {
        return Err(TrackerValidationError::InvalidColor(color.to_string()));
    }
    Ok(color)
}

/// Period days per month.
pub type PeriodLog = BTreeMap<MonthKey, BTreeSet<u32>>;
/// Mood color per day per month.
pub type MoodLog = BTreeMap<MonthKey, BTreeMap<u32, String>>;

/// Year plus zero-based month index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    pub year: i32,
    /// `0 == January`.
    pub month0: u32,
}

/// Validation error for tracker input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerValidationError {
    InvalidMonthKey(String),
    DayOutOfRange { key: MonthKey, day: u32 },
    InvalidColor(String),
    EmptyLabel,
    PaletteIndexOutOfRange(usize),
}

impl Display for TrackerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonthKey(value) => write!(f, "invalid month key `{value}`"),
            Self::DayOutOfRange { key, day } => {
                write!(f, "day {day} is outside month {key}")
            }
            Self::InvalidColor(value) => write!(f, "invalid color `{value}`"),
            Self::EmptyLabel => write!(f, "palette label cannot be empty"),
            Self::PaletteIndexOutOfRange(index) => {
                write!(f, "palette index {index} is out of range")
            }
        }
    }
}

impl Error for TrackerValidationError {}

impl MonthKey {
    pub fn new(year: i32, month0: u32) -> Result<Self, TrackerValidationError> {
        if month0 > 11 {
            return Err(TrackerValidationError::InvalidMonthKey(format!(
                "{year}-{month0}"
            )));
        }
        Ok(Self { year, month0 })
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// Number of days in this month, leap-year aware.
    pub fn days_in_month(self) -> u32 {
        days_in_month(self.year, self.month0)
    }

    /// Date of `day` within this month, if it exists.
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, day)
    }

    /// Date `day - 1` days after the first of this month.
    ///
    /// Days past the month end roll into the next month; day 0 is the last
    /// day of the previous month.
    pub fn rolling_date(self, day: u32) -> Option<NaiveDate> {
        self.date(1)?.checked_add_signed(Duration::days(i64::from(day) - 1))
    }

    /// Rejects days outside `1..=days_in_month`.
    pub fn check_day(self, day: u32) -> Result<(), TrackerValidationError> {
        if day == 0 || day > self.days_in_month() {
            return Err(TrackerValidationError::DayOutOfRange { key: self, day });
        }
        Ok(())
    }

    /// Human label such as `January 2026`.
    pub fn label(self) -> String {
        let name = crate::model::transaction::Month::from_index0(self.month0)
            .map_or("Unknown", |month| month.name());
        format!("{name} {}", self.year)
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.year, self.month0)
    }
}

impl FromStr for MonthKey {
    type Err = TrackerValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || TrackerValidationError::InvalidMonthKey(value.to_string());
        let caps = MONTH_KEY_RE.captures(value.trim()).ok_or_else(invalid)?;
        let year = caps[1].parse::<i32>().map_err(|_| invalid())?;
        let month0 = caps[2].parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month0).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = TrackerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

/// Days in a month (zero-based index), leap-year aware.
///
/// Leap years: divisible by 4 but not 100, or divisible by 400.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    const DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month0 == 1 {
        let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
        return if leap { 29 } else { 28 };
    }
    DAYS.get(month0 as usize).copied().unwrap_or(0)
}

/// One selectable mood color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: String,
    pub label: String,
}

impl PaletteEntry {
    fn new(color: &str, label: &str) -> Self {
        Self {
            color: color.to_string(),
            label: label.to_string(),
        }
    }
}

/// Ordered, user-editable mood palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodPalette {
    entries: Vec<PaletteEntry>,
}

impl Default for MoodPalette {
    fn default() -> Self {
        Self {
            entries: vec![
                PaletteEntry::new("#D6A5A5", "Happy"),
                PaletteEntry::new("#9CAF88", "Productive"),
                PaletteEntry::new("#C27664", "Calm"),
                PaletteEntry::new("#9bf6ff", "Tired"),
                PaletteEntry::new("#4A2E45", "Sad"),
            ],
        }
    }
}

impl MoodPalette {
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Replaces the color of one slot.
    ///
    /// Days already recorded with the old color keep that color and are no
    /// longer labeled by this slot.
    pub fn set_color(&mut self, index: usize, color: &str) -> Result<(), TrackerValidationError> {
        let color = check_color(color)?;
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(TrackerValidationError::PaletteIndexOutOfRange(index))?;
        entry.color = color.to_string();
        Ok(())
    }

    /// Replaces the label of one slot.
    pub fn set_label(&mut self, index: usize, label: &str) -> Result<(), TrackerValidationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(TrackerValidationError::EmptyLabel);
        }
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(TrackerValidationError::PaletteIndexOutOfRange(index))?;
        entry.label = label.to_string();
        Ok(())
    }

    /// Label of the first slot currently using `color` (case-insensitive).
    pub fn label_for(&self, color: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.color.eq_ignore_ascii_case(color))
            .map(|entry| entry.label.as_str())
    }
}
