//! Linear undo/redo over full-state snapshots.
//!
//! # Responsibility
//! - Keep `past` and `future` snapshot stacks for one editable value.
//!
//! # Invariants
//! - Recording a new snapshot clears `future`.
//! - `undo`/`redo` on an empty stack are no-ops returning `None`.
//! - With a limit set, `past` never holds more than `limit` snapshots; the
//!   oldest snapshot is dropped first.

use std::collections::VecDeque;

/// Snapshot history with an optional bound on undo depth.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    future: VecDeque<T>,
    limit: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> History<T> {
    /// History that never discards snapshots.
    pub fn unbounded() -> Self {
        Self::with_limit(None)
    }

    /// History keeping at most `limit` undo steps (`None` = unbounded).
    ///
    /// `Some(0)` is treated as unbounded.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            limit: limit.filter(|value| *value > 0),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Saves `current` before a mutation and invalidates redo history.
    pub fn record(&mut self, current: T) {
        self.past.push_back(current);
        self.future.clear();
        if let Some(limit) = self.limit {
            while self.past.len() > limit {
                self.past.pop_front();
            }
        }
    }

    /// Steps back: returns the state to restore, stashing `current` for redo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.past.pop_back()?;
        self.future.push_front(current);
        Some(previous)
    }

    /// Steps forward: returns the state to restore, stashing `current` for undo.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.future.pop_front()?;
        self.past.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}
