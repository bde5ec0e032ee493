//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `avecma_core` linkage.
//! - Print a dashboard snapshot of the configured store.
//!
//! Usage: `avecma_cli [user-email]` (guest when omitted). Storage and logging
//! follow the `AVECMA_*` environment variables.

use avecma_core::model::tracker::PeriodLog;
use avecma_core::planner::top_priorities;
use avecma_core::stats::cycle::average_cycle_length;
use avecma_core::stats::ledger::format_money;
use avecma_core::store::KvStore;
use avecma_core::{
    dashboard_stats, init_logging_from_config, AppConfig, Month, SqliteStore, StorageKey, Task,
    Transaction, UserScope,
};
use chrono::{Datelike, Local};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("avecma_core ping={}", avecma_core::ping());
    println!("avecma_core version={}", avecma_core::core_version());

    match print_snapshot(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_snapshot(user: Option<String>) -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    init_logging_from_config(&config)?;

    let scope = UserScope::new(user.as_deref());
    let store = SqliteStore::open(&config.db_path).map_err(|err| err.to_string())?;
    let tasks: Vec<Task> = store
        .load_or_default(&scope, StorageKey::CalendarEvents)
        .map_err(|err| err.to_string())?;
    let transactions: Vec<Transaction> = store
        .load_or_default(&scope, StorageKey::FinanceTransactions)
        .map_err(|err| err.to_string())?;
    let periods: PeriodLog = store
        .load_or_default(&scope, StorageKey::Periods)
        .map_err(|err| err.to_string())?;

    let today = Local::now().date_naive();
    let month = Month::from_index0(today.month0()).unwrap_or(Month::January);
    let stats = dashboard_stats(&tasks, &transactions, today, month);

    println!("store={} user={}", config.db_path.display(), scope);
    println!(
        "tasks completed={}/{} rate={}% today={} upcoming={}",
        stats.completed_tasks,
        stats.total_tasks,
        stats.completion_rate,
        stats.today_tasks,
        stats.upcoming_tasks
    );
    println!(
        "capacity={}% level={} burnout_risk={}%",
        stats.capacity,
        stats.capacity_level.as_str(),
        stats.burnout_risk
    );
    println!(
        "finance month={} income={} expenses={} paid_bills={} remaining={}",
        month,
        format_money(stats.finance.income),
        format_money(stats.finance.expenses),
        format_money(stats.finance.paid_bills),
        format_money(stats.finance.remaining)
    );
    for task in top_priorities(&tasks, 3) {
        println!("priority date={} title={}", task.date, task.title);
    }
    match average_cycle_length(&periods) {
        Some(days) => println!("cycle average_days={days}"),
        None => println!("cycle average_days=unknown"),
    }
    Ok(())
}
