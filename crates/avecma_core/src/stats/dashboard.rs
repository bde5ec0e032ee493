//! Home dashboard and analysis statistics.
//!
//! # Responsibility
//! - Combine planner and ledger reductions into one snapshot.
//!
//! # Invariants
//! - Pure function of tasks, transactions, `today` and the ledger month.

use crate::model::task::Task;
use crate::model::transaction::{Month, Transaction};
use crate::stats::capacity::{burnout_risk, capacity_score, CapacityLevel, CapacityMode};
use crate::stats::ledger::{summarize_month, LedgerSummary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Derived wellbeing/productivity snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub completed_tasks: usize,
    pub total_tasks: usize,
    /// `round(completed / total * 100)`, 0 without tasks.
    pub completion_rate: u32,
    /// Incomplete tasks dated today.
    pub today_tasks: usize,
    /// Incomplete tasks dated after today.
    pub upcoming_tasks: usize,
    pub capacity: u32,
    pub capacity_level: CapacityLevel,
    pub burnout_risk: u32,
    pub finance: LedgerSummary,
}

/// Computes the dashboard snapshot for `today` and ledger `month`.
pub fn dashboard_stats(
    tasks: &[Task],
    transactions: &[Transaction],
    today: NaiveDate,
    month: Month,
) -> DashboardStats {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|task| task.completed).count();
    let completion_rate = if total_tasks == 0 {
        0
    } else {
        (completed_tasks as f64 / total_tasks as f64 * 100.0).round() as u32
    };

    let today_tasks = tasks
        .iter()
        .filter(|task| task.is_active() && task.date == today)
        .count();
    let upcoming_tasks = tasks
        .iter()
        .filter(|task| task.is_active() && task.date > today)
        .count();

    let capacity = capacity_score(
        tasks,
        |task| task.is_active() && task.date == today,
        CapacityMode::Today.threshold(),
    );

    DashboardStats {
        completed_tasks,
        total_tasks,
        completion_rate,
        today_tasks,
        upcoming_tasks,
        capacity,
        capacity_level: CapacityLevel::of(capacity),
        burnout_risk: burnout_risk(capacity),
        finance: summarize_month(transactions, month),
    }
}
