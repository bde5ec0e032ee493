//! Budget ledger reductions.
//!
//! # Responsibility
//! - Sum one month's transactions by kind and paid status.
//! - Derive per-month trend points and recent expense amounts.
//!
//! # Invariants
//! - `remaining = income - expenses - paid_bills`; unpaid bills never count.
//! - Sums are plain `f64`; rounding happens only in `format_money`.

use crate::model::transaction::{Month, Transaction, TransactionKind};
use serde::{Deserialize, Serialize};

/// Totals for one ledger month.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub income: f64,
    pub expenses: f64,
    /// All bills, paid or not. Informative only.
    pub bills: f64,
    pub paid_bills: f64,
    /// Money left after expenses and paid bills.
    pub remaining: f64,
}

/// Income and realized outflow of one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthTrend {
    pub month: Month,
    pub income: f64,
    /// Expenses plus paid bills.
    pub outflow: f64,
}

/// Reduces the transactions of `month`.
pub fn summarize_month(transactions: &[Transaction], month: Month) -> LedgerSummary {
    let mut summary = LedgerSummary::default();
    for entry in transactions.iter().filter(|entry| entry.month == month) {
        match entry.kind {
            TransactionKind::Income => summary.income += entry.amount,
            TransactionKind::Expense => summary.expenses += entry.amount,
            TransactionKind::Bill => {
                summary.bills += entry.amount;
                if entry.is_paid {
                    summary.paid_bills += entry.amount;
                }
            }
        }
    }
    summary.remaining = summary.income - summary.expenses - summary.paid_bills;
    summary
}

/// Per-month trend in calendar order, skipping months with no activity.
pub fn monthly_trend(transactions: &[Transaction]) -> Vec<MonthTrend> {
    Month::ALL
        .iter()
        .map(|month| {
            let summary = summarize_month(transactions, *month);
            MonthTrend {
                month: *month,
                income: summary.income,
                outflow: summary.expenses + summary.paid_bills,
            }
        })
        .filter(|point| point.income > 0.0 || point.outflow > 0.0)
        .collect()
}

/// Amounts of the `limit` newest expenses (highest id first).
pub fn recent_expenses(transactions: &[Transaction], limit: usize) -> Vec<f64> {
    let mut expenses: Vec<&Transaction> = transactions
        .iter()
        .filter(|entry| entry.kind == TransactionKind::Expense)
        .collect();
    expenses.sort_by(|a, b| b.id.cmp(&a.id));
    expenses
        .into_iter()
        .take(limit)
        .map(|entry| entry.amount)
        .collect()
}

/// Display formatting with two decimals and a dollar sign.
pub fn format_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${amount:.2}")
    }
}
