//! Core domain logic for Avec Ma.
//! This crate is the single source of truth for planner, tracker, ledger and
//! assistant invariants.

pub mod assistant;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod planner;
pub mod service;
pub mod stats;
pub mod store;

pub use assistant::{
    handle_analyze_json, handle_chat_json, AssistantError, AssistantErrorKind, GeminiClient,
    GenerativeClient, RelayResponse,
};
pub use config::{AppConfig, AssistantConfig, ConfigError};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::task::{LoadLevel, NewTask, Task, TaskId, TaskValidationError};
pub use model::tracker::{MonthKey, MoodPalette, TrackerValidationError};
pub use model::transaction::{
    Month, Transaction, TransactionId, TransactionKind, TransactionValidationError,
};
pub use planner::history::History;
pub use planner::{Planner, PlannerError};
pub use service::calendar_service::CalendarService;
pub use service::finance_service::{FinanceService, TransactionDraft};
pub use service::profile_service::ProfileService;
pub use service::tracker_service::TrackerService;
pub use service::{ServiceError, ServiceResult};
pub use stats::capacity::{capacity_score, CapacityLevel, CapacityMode};
pub use stats::cycle::{average_cycle_length, compress_ranges, DayRange};
pub use stats::dashboard::{dashboard_stats, DashboardStats};
pub use stats::ledger::{summarize_month, LedgerSummary};
pub use store::{KvStore, MemoryStore, SqliteStore, StorageKey, StoreError, UserScope};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
