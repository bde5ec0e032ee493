//! Capacity scoring over planner tasks.
//!
//! # Responsibility
//! - Reduce a filtered task list into a 0..=100 saturation score.
//! - Provide the planner's today/month/year predicates and thresholds.
//!
//! # Invariants
//! - Results are always within `0..=100`.
//! - An empty filtered set scores 0.
//! - Pure functions; callers recompute after every state change.

use crate::model::task::Task;
use crate::model::tracker::MonthKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Window a capacity score is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityMode {
    Today,
    Month,
    Year,
}

impl CapacityMode {
    /// Point budget that maps to 100%.
    pub fn threshold(self) -> u32 {
        match self {
            Self::Today => 10,
            Self::Month => 60,
            Self::Year => 300,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Some(Self::Today),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

/// Coarse bucket shown next to a capacity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CapacityLevel {
    Low,
    Medium,
    High,
}

impl CapacityLevel {
    pub fn of(capacity: u32) -> Self {
        if capacity < 50 {
            Self::Low
        } else if capacity < 80 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Weighted saturation of the tasks accepted by `predicate`.
///
/// `capacity = min(floor(total_weight / threshold * 100), 100)`; a zero
/// threshold saturates as soon as any weight is present.
pub fn capacity_score<'a, I, P>(tasks: I, predicate: P, threshold: u32) -> u32
where
    I: IntoIterator<Item = &'a Task>,
    P: Fn(&Task) -> bool,
{
    let total_weight: u64 = tasks
        .into_iter()
        .filter(|&task| predicate(task))
        .map(|task| u64::from(task.weight()))
        .sum();

    if total_weight == 0 {
        return 0;
    }
    if threshold == 0 {
        return 100;
    }

    let percent = total_weight.saturating_mul(100) / u64::from(threshold);
    percent.min(100) as u32
}

/// Planner capacity for one mode.
///
/// - `Today`: active tasks dated `today`.
/// - `Month`: active tasks dated inside `viewed`.
/// - `Year`: every active task.
pub fn planner_capacity(
    tasks: &[Task],
    mode: CapacityMode,
    today: NaiveDate,
    viewed: MonthKey,
) -> u32 {
    let threshold = mode.threshold();
    match mode {
        CapacityMode::Today => capacity_score(
            tasks,
            |task| task.is_active() && task.date == today,
            threshold,
        ),
        CapacityMode::Month => capacity_score(
            tasks,
            |task| task.is_active() && MonthKey::of(task.date) == viewed,
            threshold,
        ),
        CapacityMode::Year => capacity_score(tasks, Task::is_active, threshold),
    }
}

/// Burnout risk derived from today's capacity.
///
/// Zero when nothing is scheduled, otherwise `min(100 - capacity + 20, 100)`.
pub fn burnout_risk(capacity: u32) -> u32 {
    if capacity == 0 {
        return 0;
    }
    (120u32.saturating_sub(capacity.min(100))).min(100)
}

#[cfg(test)]
mod tests {
    use super::{burnout_risk, capacity_score, planner_capacity, CapacityLevel, CapacityMode};
    use crate::model::task::{LoadLevel, Task};
    use crate::model::tracker::MonthKey;
    use chrono::NaiveDate;

    fn task(id: i64, date: (i32, u32, u32), load: Option<LoadLevel>, completed: bool) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: "All Day".to_string(),
            load,
            is_all_day: true,
            completed,
        }
    }

    #[test]
    fn empty_set_scores_zero() {
        let tasks: Vec<Task> = Vec::new();
        assert_eq!(capacity_score(&tasks, |_| true, 10), 0);
    }

    #[test]
    fn score_floors_and_caps() {
        let tasks = vec![
            task(1, (2026, 1, 5), Some(LoadLevel::Light), false),
            task(2, (2026, 1, 5), Some(LoadLevel::Medium), false),
        ];
        // 4 / 60 * 100 = 6.66
        assert_eq!(capacity_score(&tasks, |_| true, 60), 6);

        let heavy: Vec<Task> = (0..5)
            .map(|id| task(id, (2026, 1, 5), Some(LoadLevel::Heavy), false))
            .collect();
        assert_eq!(capacity_score(&heavy, |_| true, 10), 100);
    }

    #[test]
    fn planner_modes_filter_by_window() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let viewed = MonthKey::new(2026, 0).unwrap();
        let tasks = vec![
            task(1, (2026, 1, 5), Some(LoadLevel::Heavy), false),
            task(2, (2026, 1, 5), None, false),
            task(3, (2026, 1, 5), Some(LoadLevel::Heavy), true),
            task(4, (2026, 1, 20), Some(LoadLevel::Medium), false),
            task(5, (2027, 3, 1), Some(LoadLevel::Light), false),
        ];

        assert_eq!(planner_capacity(&tasks, CapacityMode::Today, today, viewed), 80);
        // (5 + 3 + 3) / 60
        assert_eq!(planner_capacity(&tasks, CapacityMode::Month, today, viewed), 18);
        // (5 + 3 + 3 + 1) / 300
        assert_eq!(planner_capacity(&tasks, CapacityMode::Year, today, viewed), 4);
    }

    #[test]
    fn levels_and_burnout_follow_capacity() {
        assert_eq!(CapacityLevel::of(49), CapacityLevel::Low);
        assert_eq!(CapacityLevel::of(50), CapacityLevel::Medium);
        assert_eq!(CapacityLevel::of(80), CapacityLevel::High);
        assert_eq!(burnout_risk(0), 0);
        assert_eq!(burnout_risk(10), 100);
        assert_eq!(burnout_risk(90), 30);
        assert_eq!(burnout_risk(100), 20);
    }
}
