//! Ledger use-case service.
//!
//! # Responsibility
//! - Apply add/edit/delete/paid/clear operations to one user's ledger.
//! - Expose month summaries and the chart trend over the persisted list.
//!
//! # Invariants
//! - New entries are prepended (newest first), unpaid.
//! - Edits keep the entry's month and paid flag.
//! - Every successful mutation rewrites the stored ledger.

use crate::model::next_record_id;
use crate::model::transaction::{Month, Transaction, TransactionId, TransactionKind};
use crate::service::{now_epoch_ms, ServiceError, ServiceResult};
use crate::stats::ledger::{
    monthly_trend, recent_expenses, summarize_month, LedgerSummary, MonthTrend,
};
use crate::store::{KvStore, StorageKey, UserScope};
use log::info;

/// Input for one new or edited ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub label: String,
    pub amount: f64,
    pub kind: TransactionKind,
}

/// Ledger service facade over a store implementation.
pub struct FinanceService<S: KvStore> {
    store: S,
    scope: UserScope,
}

impl<S: KvStore> FinanceService<S> {
    pub fn new(store: S, scope: UserScope) -> Self {
        Self { store, scope }
    }

    /// All entries, newest first.
    pub fn list(&self) -> ServiceResult<Vec<Transaction>> {
        Ok(self
            .store
            .load_or_default(&self.scope, StorageKey::FinanceTransactions)?)
    }

    /// Adds an unpaid entry to `month` and returns it.
    pub fn add(&self, draft: TransactionDraft, month: Month) -> ServiceResult<Transaction> {
        let mut entries = self.list()?;
        let now = now_epoch_ms();
        let newest = entries.iter().map(|entry| entry.id).max();
        let id = next_record_id(newest, now).ok_or(ServiceError::TransactionIdsExhausted)?;
        let entry = Transaction::new(id, &draft.label, draft.amount, draft.kind, month)?;
        entries.insert(0, entry.clone());
        self.persist(&entries)?;
        info!(
            "event=ledger_add module=service status=ok kind={:?} month={} entries={}",
            entry.kind,
            month,
            entries.len()
        );
        Ok(entry)
    }

    /// Replaces label, amount and kind of one entry.
    pub fn edit(&self, id: TransactionId, draft: TransactionDraft) -> ServiceResult<Transaction> {
        let mut entries = self.list()?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(ServiceError::TransactionNotFound(id))?;
        entry.apply_edit(&draft.label, draft.amount, draft.kind)?;
        let updated = entry.clone();
        self.persist(&entries)?;
        Ok(updated)
    }

    /// Deletes one entry; returns whether it existed.
    pub fn delete(&self, id: TransactionId) -> ServiceResult<bool> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.persist(&entries)?;
        Ok(true)
    }

    /// Flips the paid flag of one entry and returns the new value.
    pub fn toggle_paid(&self, id: TransactionId) -> ServiceResult<bool> {
        let mut entries = self.list()?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(ServiceError::TransactionNotFound(id))?;
        entry.is_paid = !entry.is_paid;
        let paid = entry.is_paid;
        self.persist(&entries)?;
        Ok(paid)
    }

    /// Drops every entry of `month`; returns how many were removed.
    pub fn clear_month(&self, month: Month) -> ServiceResult<usize> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|entry| entry.month != month);
        let removed = before - entries.len();
        if removed > 0 {
            self.persist(&entries)?;
        }
        info!(
            "event=ledger_clear_month module=service status=ok month={} removed={}",
            month, removed
        );
        Ok(removed)
    }

    pub fn summary(&self, month: Month) -> ServiceResult<LedgerSummary> {
        Ok(summarize_month(&self.list()?, month))
    }

    pub fn trend(&self) -> ServiceResult<Vec<MonthTrend>> {
        Ok(monthly_trend(&self.list()?))
    }

    pub fn recent_expenses(&self, limit: usize) -> ServiceResult<Vec<f64>> {
        Ok(recent_expenses(&self.list()?, limit))
    }

    fn persist(&self, entries: &[Transaction]) -> ServiceResult<()> {
        self.store
            .save(&self.scope, StorageKey::FinanceTransactions, entries)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FinanceService, TransactionDraft};
    use crate::model::transaction::{Month, Transaction, TransactionKind};
    use crate::service::ServiceError;
    use crate::store::{KvStore, MemoryStore, StorageKey, UserScope};

    fn draft(label: &str, amount: f64, kind: TransactionKind) -> TransactionDraft {
        TransactionDraft {
            label: label.to_string(),
            amount,
            kind,
        }
    }

    #[test]
    fn add_prepends_and_rejects_blank_labels() {
        let service = FinanceService::new(MemoryStore::new(), UserScope::guest());
        service
            .add(draft("Salary", 2000.0, TransactionKind::Income), Month::March)
            .unwrap();
        let rent = service
            .add(draft(" Rent ", 900.0, TransactionKind::Bill), Month::March)
            .unwrap();
        assert_eq!(rent.label, "Rent");
        assert_eq!(service.list().unwrap()[0].id, rent.id);

        let err = service
            .add(draft("   ", 10.0, TransactionKind::Expense), Month::March)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transaction(_)));
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn edit_keeps_month_and_paid_flag() {
        let service = FinanceService::new(MemoryStore::new(), UserScope::guest());
        let bill = service
            .add(draft("Power", 80.0, TransactionKind::Bill), Month::May)
            .unwrap();
        assert!(service.toggle_paid(bill.id).unwrap());

        let edited = service
            .edit(bill.id, draft("Electricity", 95.0, TransactionKind::Bill))
            .unwrap();
        assert_eq!(edited.month, Month::May);
        assert!(edited.is_paid);
        assert_eq!(edited.amount, 95.0);
    }

    #[test]
    fn clear_month_only_touches_that_month() {
        let service = FinanceService::new(MemoryStore::new(), UserScope::guest());
        service
            .add(draft("Coffee", 4.0, TransactionKind::Expense), Month::June)
            .unwrap();
        service
            .add(draft("Books", 30.0, TransactionKind::Expense), Month::July)
            .unwrap();
        assert_eq!(service.clear_month(Month::June).unwrap(), 1);
        let left = service.list().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].month, Month::July);
    }

    #[test]
    fn add_after_max_id_fails_cleanly() {
        let store = MemoryStore::new();
        let scope = UserScope::guest();
        let last = Transaction::new(
            i64::MAX,
            "Legacy",
            1.0,
            TransactionKind::Expense,
            Month::May,
        )
        .unwrap();
        store
            .save(&scope, StorageKey::FinanceTransactions, &[last])
            .unwrap();

        let service = FinanceService::new(store, scope);
        let err = service
            .add(draft("Milk", 3.0, TransactionKind::Expense), Month::May)
            .unwrap_err();
        assert!(matches!(err, ServiceError::TransactionIdsExhausted));
        assert_eq!(service.list().unwrap().len(), 1);
    }
}
