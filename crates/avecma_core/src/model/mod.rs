//! Domain model for planner, ledger, tracker and assistant records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep field names aligned with the JSON persisted per user.
//!
//! # Invariants
//! - Constructors validate user input; persisted data is trusted on load.

pub mod chat;
pub mod task;
pub mod tracker;
pub mod transaction;

/// Next creation-time id: `now_ms`, or one past `newest` when the clock has
/// not advanced. `None` once ids would overflow.
pub(crate) fn next_record_id(newest: Option<i64>, now_ms: i64) -> Option<i64> {
    match newest {
        Some(newest) if newest >= now_ms => newest.checked_add(1),
        _ => Some(now_ms),
    }
}
