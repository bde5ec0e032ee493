//! Calendar planner use-case service.
//!
//! # Responsibility
//! - Bind one user's persisted task list to an in-memory `Planner`.
//! - Persist the task list after every mutation, undo and redo.
//!
//! # Invariants
//! - Undo/redo history lives only in memory; a fresh service starts with
//!   empty history over the persisted list.
//! - Storage is written only after the in-memory mutation succeeded.
//! - A failed write rolls tasks and history back to the pre-call state.

use crate::model::task::{NewTask, Task, TaskId};
use crate::model::tracker::MonthKey;
use crate::planner::{Planner, PlannerError};
use crate::service::{now_epoch_ms, ServiceResult};
use crate::stats::capacity::CapacityMode;
use crate::store::{KvStore, StorageKey, UserScope};
use chrono::NaiveDate;
use log::{info, warn};

/// Calendar service facade over a store implementation.
pub struct CalendarService<S: KvStore> {
    store: S,
    scope: UserScope,
    planner: Planner,
}

impl<S: KvStore> CalendarService<S> {
    /// Loads the user's tasks; corrupt or missing data starts empty.
    pub fn load(store: S, scope: UserScope, history_limit: Option<usize>) -> ServiceResult<Self> {
        let tasks: Vec<Task> = store.load_or_default(&scope, StorageKey::CalendarEvents)?;
        info!(
            "event=calendar_load module=service status=ok tasks={} history_limit={}",
            tasks.len(),
            history_limit.map_or_else(|| "unbounded".to_string(), |limit| limit.to_string())
        );
        Ok(Self {
            store,
            scope,
            planner: Planner::new(tasks, history_limit),
        })
    }

    pub fn scope(&self) -> &UserScope {
        &self.scope
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn tasks(&self) -> &[Task] {
        self.planner.tasks()
    }

    /// Adds one task and persists the list.
    pub fn add_task(&mut self, input: NewTask) -> ServiceResult<TaskId> {
        let now_ms = now_epoch_ms();
        self.commit("add", |planner| planner.add_task(input, now_ms))
    }

    /// Toggles completion and persists the list; returns the new flag.
    pub fn toggle_complete(&mut self, id: TaskId) -> ServiceResult<bool> {
        self.commit("toggle", |planner| planner.toggle_complete(id))
    }

    /// Undoes the last mutation; returns `false` when nothing changed.
    pub fn undo(&mut self) -> ServiceResult<bool> {
        self.commit_if_changed("undo", Planner::undo)
    }

    /// Redoes the last undone mutation; returns `false` when nothing changed.
    pub fn redo(&mut self) -> ServiceResult<bool> {
        self.commit_if_changed("redo", Planner::redo)
    }

    /// Capacity for `mode` relative to `today` and the viewed month.
    pub fn capacity(&self, mode: CapacityMode, today: NaiveDate, viewed: MonthKey) -> u32 {
        self.planner.capacity(mode, today, viewed)
    }

    /// Re-reads the persisted list and drops history (e.g. after sign-out).
    pub fn reload(&mut self) -> ServiceResult<()> {
        let tasks: Vec<Task> = self
            .store
            .load_or_default(&self.scope, StorageKey::CalendarEvents)?;
        self.planner = Planner::new(tasks, self.planner.history_limit());
        Ok(())
    }

    /// Applies `apply` and persists; restores the previous planner when
    /// either step fails.
    fn commit<T>(
        &mut self,
        op: &str,
        apply: impl FnOnce(&mut Planner) -> Result<T, PlannerError>,
    ) -> ServiceResult<T> {
        let before = self.planner.clone();
        let value = apply(&mut self.planner)?;
        self.persist_or_rollback(op, before)?;
        Ok(value)
    }

    fn commit_if_changed(
        &mut self,
        op: &str,
        step: fn(&mut Planner) -> bool,
    ) -> ServiceResult<bool> {
        let before = self.planner.clone();
        if !step(&mut self.planner) {
            return Ok(false);
        }
        self.persist_or_rollback(op, before)?;
        Ok(true)
    }

    fn persist_or_rollback(&mut self, op: &str, before: Planner) -> ServiceResult<()> {
        if let Err(err) = self.persist() {
            warn!("event=calendar_persist module=service status=rolled_back op={op} error={err}");
            self.planner = before;
            return Err(err);
        }
        Ok(())
    }

    fn persist(&self) -> ServiceResult<()> {
        self.store
            .save(&self.scope, StorageKey::CalendarEvents, self.planner.tasks())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CalendarService;
    use crate::db::DbError;
    use crate::model::task::{LoadLevel, NewTask, Task};
    use crate::service::ServiceError;
    use crate::store::{KvStore, MemoryStore, StorageKey, StoreError, StoreResult, UserScope};
    use chrono::NaiveDate;
    use std::cell::Cell;

    /// Memory store whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        reject_writes: Cell<bool>,
    }

    impl KvStore for FlakyStore {
        fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get_raw(key)
        }

        fn put_raw(&self, key: &str, scope: &str, value: &str) -> StoreResult<()> {
            if self.reject_writes.get() {
                return Err(StoreError::Db(DbError::UnsupportedSchemaVersion {
                    db_version: 99,
                    latest_supported: 2,
                }));
            }
            self.inner.put_raw(key, scope, value)
        }

        fn remove_raw(&self, key: &str) -> StoreResult<bool> {
            self.inner.remove_raw(key)
        }

        fn keys_for_scope(&self, scope: &str) -> StoreResult<Vec<String>> {
            self.inner.keys_for_scope(scope)
        }
    }

    fn walk() -> NewTask {
        NewTask {
            title: "Walk".to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            time: None,
            load: Some(LoadLevel::Light),
            is_all_day: true,
        }
    }

    fn persisted_len(calendar: &CalendarService<FlakyStore>) -> usize {
        let tasks: Vec<Task> = calendar
            .store
            .load_or_default(calendar.scope(), StorageKey::CalendarEvents)
            .unwrap();
        tasks.len()
    }

    #[test]
    fn failed_write_rolls_back_add() {
        let store = FlakyStore {
            reject_writes: Cell::new(true),
            ..FlakyStore::default()
        };
        let mut calendar = CalendarService::load(store, UserScope::guest(), None).unwrap();

        let err = calendar.add_task(walk()).unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
        assert!(calendar.tasks().is_empty());
        assert!(!calendar.planner().can_undo());
    }

    #[test]
    fn failed_write_keeps_toggle_undo_and_redo_in_sync() {
        let mut calendar =
            CalendarService::load(FlakyStore::default(), UserScope::guest(), None).unwrap();
        let id = calendar.add_task(walk()).unwrap();
        calendar.store.reject_writes.set(true);

        assert!(calendar.toggle_complete(id).is_err());
        assert!(!calendar.tasks()[0].completed);

        assert!(calendar.undo().is_err());
        assert_eq!(calendar.tasks().len(), 1);
        assert!(calendar.planner().can_undo());
        assert!(!calendar.planner().can_redo());

        calendar.store.reject_writes.set(false);
        assert!(calendar.undo().unwrap());
        assert_eq!(persisted_len(&calendar), 0);

        calendar.store.reject_writes.set(true);
        assert!(calendar.redo().is_err());
        assert!(calendar.tasks().is_empty());
        assert!(calendar.planner().can_redo());
        assert_eq!(persisted_len(&calendar), 0);
    }

    #[test]
    fn noop_undo_does_not_write() {
        let store = FlakyStore {
            reject_writes: Cell::new(true),
            ..FlakyStore::default()
        };
        let mut calendar = CalendarService::load(store, UserScope::guest(), None).unwrap();
        assert!(!calendar.undo().unwrap());
        assert!(!calendar.redo().unwrap());
    }
}
