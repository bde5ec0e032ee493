//! Budget ledger transaction model.
//!
//! # Responsibility
//! - Define the income/expense/bill record persisted by the finance tracker.
//! - Name calendar months the way the ledger groups entries.
//!
//! # Invariants
//! - `label` is non-blank and trimmed.
//! - `amount` is finite; sums use plain `f64` arithmetic.
//! - `is_paid` is only meaningful for `TransactionKind::Bill`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable transaction identifier (creation timestamp in epoch milliseconds).
pub type TransactionId = i64;

/// Ledger category of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Bill,
}

/// Calendar month used to bucket ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Builds a month from a zero-based index (`0 == January`).
    pub fn from_index0(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Zero-based month index.
    pub fn index0(self) -> u32 {
        self as u32
    }

    /// English month name.
    pub fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = TransactionValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|month| month.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TransactionValidationError::UnknownMonth(trimmed.to_string()))
    }
}

/// Ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub label: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub month: Month,
    #[serde(default)]
    pub is_paid: bool,
}

/// Validation error for ledger input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyLabel,
    NonFiniteAmount,
    UnknownMonth(String),
}

impl Display for TransactionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLabel => write!(f, "transaction label cannot be empty"),
            Self::NonFiniteAmount => write!(f, "transaction amount must be a finite number"),
            Self::UnknownMonth(value) => write!(f, "unknown month `{value}`"),
        }
    }
}

impl Error for TransactionValidationError {}

impl Transaction {
    /// Builds a validated, unpaid entry.
    pub fn new(
        id: TransactionId,
        label: &str,
        amount: f64,
        kind: TransactionKind,
        month: Month,
    ) -> Result<Self, TransactionValidationError> {
        let label = validate_entry(label, amount)?;
        Ok(Self {
            id,
            label,
            amount,
            kind,
            month,
            is_paid: false,
        })
    }

    /// Replaces label/amount/kind; month and paid flag are kept.
    pub fn apply_edit(
        &mut self,
        label: &str,
        amount: f64,
        kind: TransactionKind,
    ) -> Result<(), TransactionValidationError> {
        self.label = validate_entry(label, amount)?;
        self.amount = amount;
        self.kind = kind;
        Ok(())
    }
}

fn validate_entry(label: &str, amount: f64) -> Result<String, TransactionValidationError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(TransactionValidationError::EmptyLabel);
    }
    if !amount.is_finite() {
        return Err(TransactionValidationError::NonFiniteAmount);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Month, Transaction, TransactionKind, TransactionValidationError};

    #[test]
    fn month_parses_case_insensitively() {
        assert_eq!("march".parse::<Month>().unwrap(), Month::March);
        assert_eq!(Month::from_index0(11), Some(Month::December));
        assert_eq!(Month::from_index0(12), None);
        assert!("Smarch".parse::<Month>().is_err());
    }

    #[test]
    fn new_rejects_blank_label_and_nan() {
        let err = Transaction::new(1, "   ", 10.0, TransactionKind::Income, Month::May)
            .unwrap_err();
        assert_eq!(err, TransactionValidationError::EmptyLabel);
        let err = Transaction::new(1, "Rent", f64::NAN, TransactionKind::Bill, Month::May)
            .unwrap_err();
        assert_eq!(err, TransactionValidationError::NonFiniteAmount);
    }

    #[test]
    fn edit_keeps_month_and_paid_flag() {
        let mut entry =
            Transaction::new(1, "Rent", 900.0, TransactionKind::Bill, Month::May).unwrap();
        entry.is_paid = true;
        entry
            .apply_edit(" Groceries ", 54.5, TransactionKind::Expense)
            .unwrap();
        assert_eq!(entry.label, "Groceries");
        assert_eq!(entry.month, Month::May);
        assert!(entry.is_paid);
    }

    #[test]
    fn serializes_with_storage_field_names() {
        let entry = Transaction::new(3, "Pay", 1000.0, TransactionKind::Income, Month::January)
            .unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["month"], "January");
        assert_eq!(value["isPaid"], false);
    }
}
