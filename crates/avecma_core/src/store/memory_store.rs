//! Process-local store for tests and throwaway sessions.

use super::{KvStore, StoreResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// `BTreeMap`-backed store; nothing survives the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, (String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .entries
            .borrow()
            .get(key)
            .map(|(_, value)| value.clone()))
    }

    fn put_raw(&self, key: &str, scope: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), (scope.to_string(), value.to_string()));
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> StoreResult<bool> {
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }

    fn keys_for_scope(&self, scope: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|(_, (owner, _))| owner == scope)
            .map(|(key, _)| key.clone())
            .collect())
    }
}
