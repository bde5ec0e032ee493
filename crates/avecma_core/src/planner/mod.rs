//! In-memory calendar planner state.
//!
//! # Responsibility
//! - Hold the task list together with its undo/redo history.
//! - Apply the two task mutations (add, toggle completion).
//! - Answer derived views (capacity, priorities).
//!
//! # Invariants
//! - Every mutation records a snapshot first, so it can be undone.
//! - A toggle of an unknown id is rejected and records nothing.
//! - Task ids are strictly increasing within one planner.

pub mod history;

use crate::model::next_record_id;
use crate::model::task::{NewTask, Task, TaskId, TaskValidationError};
use crate::model::tracker::MonthKey;
use crate::stats::capacity::{planner_capacity, CapacityMode};
use chrono::NaiveDate;
use history::History;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for planner mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    Validation(TaskValidationError),
    TaskNotFound(TaskId),
    /// The newest stored id leaves no room for another one.
    IdsExhausted,
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::IdsExhausted => write!(f, "no task id left after the newest one"),
        }
    }
}

impl Error for PlannerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::TaskNotFound(_) | Self::IdsExhausted => None,
        }
    }
}

impl From<TaskValidationError> for PlannerError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Task list with linear undo/redo.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    tasks: Vec<Task>,
    history: History<Vec<Task>>,
}

impl Planner {
    /// Creates a planner over previously persisted tasks with empty history.
    pub fn new(tasks: Vec<Task>, history_limit: Option<usize>) -> Self {
        Self {
            tasks,
            history: History::with_limit(history_limit),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Appends a validated task and returns its id.
    ///
    /// `now_ms` is the creation clock; the id is bumped past the newest
    /// existing id when the clock has not advanced.
    pub fn add_task(&mut self, input: NewTask, now_ms: i64) -> Result<TaskId, PlannerError> {
        let newest = self.tasks.iter().map(|task| task.id).max();
        let id = next_record_id(newest, now_ms).ok_or(PlannerError::IdsExhausted)?;
        let task = Task::from_input(id, input)?;

        self.history.record(self.tasks.clone());
        self.tasks.push(task);
        Ok(id)
    }

    /// Flips `completed` for one task and returns the new value.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<bool, PlannerError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(PlannerError::TaskNotFound(id))?;

        self.history.record(self.tasks.clone());
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        Ok(task.completed)
    }

    /// Restores the previous snapshot; returns `false` when nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = std::mem::take(&mut self.tasks);
        match self.history.undo(current.clone()) {
            Some(previous) => {
                self.tasks = previous;
                true
            }
            None => {
                self.tasks = current;
                false
            }
        }
    }

    /// Re-applies an undone snapshot; returns `false` when nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = std::mem::take(&mut self.tasks);
        match self.history.redo(current.clone()) {
            Some(next) => {
                self.tasks = next;
                true
            }
            None => {
                self.tasks = current;
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_limit(&self) -> Option<usize> {
        self.history.limit()
    }

    /// Capacity score for `mode`, relative to `today` and the viewed month.
    pub fn capacity(&self, mode: CapacityMode, today: NaiveDate, viewed: MonthKey) -> u32 {
        planner_capacity(&self.tasks, mode, today, viewed)
    }

    /// First `limit` incomplete tasks ordered by date.
    pub fn top_priorities(&self, limit: usize) -> Vec<&Task> {
        top_priorities(&self.tasks, limit)
    }
}

/// First `limit` incomplete tasks ordered by date; ties keep insertion order.
pub fn top_priorities(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut active: Vec<&Task> = tasks.iter().filter(|task| task.is_active()).collect();
    active.sort_by_key(|task| task.date);
    active.truncate(limit);
    active
}
