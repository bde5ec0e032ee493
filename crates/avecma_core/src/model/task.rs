//! Planner task model.
//!
//! # Responsibility
//! - Define the calendar task record as it is persisted and relayed.
//! - Own the load-weight table used by capacity scoring.
//!
//! # Invariants
//! - `id` is the creation timestamp in epoch milliseconds and never reused.
//! - All-day tasks store `time == "All Day"`.
//! - `completed` is the only field mutated after creation.
//!
//! # See also
//! - crate::stats::capacity

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static TIME_OF_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid time regex"));

/// Time label stored for all-day tasks.
pub const ALL_DAY_LABEL: &str = "All Day";

/// Weight applied when a task carries no recognizable load.
pub const DEFAULT_LOAD_WEIGHT: u32 = 3;

/// Stable task identifier (creation timestamp in epoch milliseconds).
pub type TaskId = i64;

/// Subjective difficulty tier of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadLevel {
    Light,
    Medium,
    Heavy,
}

impl LoadLevel {
    /// Capacity points consumed by one task of this tier.
    pub fn weight(self) -> u32 {
        match self {
            Self::Light => 1,
            Self::Medium => 3,
            Self::Heavy => 5,
        }
    }

    /// Lowercase label used in storage and prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }

    /// Parses a stored label; unknown labels yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "medium" => Some(Self::Medium),
            "heavy" => Some(Self::Heavy),
            _ => None,
        }
    }
}

/// Weight lookup that tolerates missing or unknown loads.
pub fn load_weight(load: Option<LoadLevel>) -> u32 {
    load.map_or(DEFAULT_LOAD_WEIGHT, LoadLevel::weight)
}

/// Calendar task (also rendered as an "event" by the planner views).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Free-form notes; stored under `desc`.
    #[serde(rename = "desc", alias = "description", default)]
    pub description: String,
    pub date: NaiveDate,
    /// `"All Day"` or `HH:MM`.
    #[serde(default)]
    pub time: String,
    /// `None` when persisted data carries an unknown or missing load.
    #[serde(default, deserialize_with = "deserialize_lenient_load")]
    pub load: Option<LoadLevel>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub completed: bool,
}

/// Form input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// Ignored when `is_all_day` is set.
    pub time: Option<String>,
    /// Defaults to `LoadLevel::Medium` when absent.
    pub load: Option<LoadLevel>,
    pub is_all_day: bool,
}

/// Validation error for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    MissingTime,
    InvalidTime(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::MissingTime => write!(f, "timed task requires a time of day"),
            Self::InvalidTime(value) => {
                write!(f, "task time `{value}` must use 24h HH:MM format")
            }
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Builds a validated task from form input.
    ///
    /// # Invariants
    /// - Title and description are trimmed.
    /// - `completed` starts as `false`.
    pub fn from_input(id: TaskId, input: NewTask) -> Result<Self, TaskValidationError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        let time = if input.is_all_day {
            ALL_DAY_LABEL.to_string()
        } else {
            let raw = input.time.ok_or(TaskValidationError::MissingTime)?;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(TaskValidationError::MissingTime);
            }
            if !TIME_OF_DAY_RE.is_match(trimmed) {
                return Err(TaskValidationError::InvalidTime(trimmed.to_string()));
            }
            trimmed.to_string()
        };

        Ok(Self {
            id,
            title,
            description: input.description.trim().to_string(),
            date: input.date,
            time,
            load: Some(input.load.unwrap_or(LoadLevel::Medium)),
            is_all_day: input.is_all_day,
            completed: false,
        })
    }

    /// Capacity points this task consumes while active.
    pub fn weight(&self) -> u32 {
        load_weight(self.load)
    }

    /// Returns whether the task still counts toward capacity.
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

fn deserialize_lenient_load<'de, D>(deserializer: D) -> Result<Option<LoadLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(LoadLevel::parse))
}
