//! In-memory task store implementing the range-query collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};
use crate::report::TaskLookup;
use crate::scoring::{ScoringPolicy, TaskScore};
use crate::task::{NewTask, Task, TaskUpdate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Next numeric id, one past the largest numeric id in the store.
    fn next_id(&self) -> String {
        let max = self
            .tasks
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }

    pub fn create(&mut self, new: NewTask, now: DateTime<Utc>) -> Result<&Task> {
        let task = Task::create(self.next_id(), new, now)?;
        self.tasks.push(task);
        let idx = self.tasks.len() - 1;
        Ok(&self.tasks[idx])
    }

    pub fn get(&self, id: &str) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CadenceError::TaskNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CadenceError::TaskNotFound(id.to_string()))
    }

    pub fn update(&mut self, id: &str, update: TaskUpdate, policy: &ScoringPolicy, now: DateTime<Utc>) -> Result<TaskScore> {
        self.get_mut(id)?.apply_update(update, policy, now)
    }

    pub fn toggle(&mut self, id: &str, policy: &ScoringPolicy, now: DateTime<Utc>) -> Result<TaskScore> {
        self.get_mut(id)?.toggle_completion(policy, now)
    }

    pub fn contains_external_id(&self, external_id: &str) -> bool {
        self.tasks
            .iter()
            .any(|t| t.external_id.as_deref() == Some(external_id))
    }
}

impl TaskLookup for TaskStore {
    fn tasks_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> anyhow::Result<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| start <= t.scheduled_start && t.scheduled_start <= end)
            .cloned()
            .collect())
    }
}
