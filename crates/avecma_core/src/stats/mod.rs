//! Derived-state reductions shared by planner, tracker, ledger and dashboard.
//!
//! # Responsibility
//! - Keep every score and estimate a pure function of in-memory records.
//!
//! # Invariants
//! - No module here performs I/O or logging.

pub mod capacity;
pub mod cycle;
pub mod dashboard;
pub mod ledger;
