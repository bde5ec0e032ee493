//! Core use-case services.
//!
//! # Responsibility
//! - Load a user's documents, apply one use-case, persist the result.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - A failed validation leaves both memory and storage untouched.
//! - Services remain storage-agnostic (generic over `KvStore`).

pub mod calendar_service;
pub mod finance_service;
pub mod profile_service;
pub mod tracker_service;

use crate::model::tracker::TrackerValidationError;
use crate::model::transaction::{TransactionId, TransactionValidationError};
use crate::planner::PlannerError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for all use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Persistence-layer failure.
    Store(StoreError),
    /// Task validation or lookup failure.
    Planner(PlannerError),
    /// Ledger input failed validation.
    Transaction(TransactionValidationError),
    /// Tracker input failed validation.
    Tracker(TrackerValidationError),
    /// Target ledger entry does not exist.
    TransactionNotFound(TransactionId),
    /// The newest ledger id leaves no room for another one.
    TransactionIdsExhausted,
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Planner(err) => write!(f, "{err}"),
            Self::Transaction(err) => write!(f, "{err}"),
            Self::Tracker(err) => write!(f, "{err}"),
            Self::TransactionNotFound(id) => write!(f, "transaction not found: {id}"),
            Self::TransactionIdsExhausted => write!(f, "no transaction id left"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Planner(err) => Some(err),
            Self::Transaction(err) => Some(err),
            Self::Tracker(err) => Some(err),
            Self::TransactionNotFound(_) | Self::TransactionIdsExhausted => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<PlannerError> for ServiceError {
    fn from(value: PlannerError) -> Self {
        Self::Planner(value)
    }
}

impl From<TransactionValidationError> for ServiceError {
    fn from(value: TransactionValidationError) -> Self {
        Self::Transaction(value)
    }
}

impl From<TrackerValidationError> for ServiceError {
    fn from(value: TrackerValidationError) -> Self {
        Self::Tracker(value)
    }
}

/// Current wall clock in epoch milliseconds, used to mint record ids.
pub(crate) fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
