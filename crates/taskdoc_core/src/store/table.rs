//! Ordered in-memory task collection with an id index.

use crate::model::task::{Task, TaskId};
use std::collections::HashMap;

/// Tasks in insertion order plus an id -> position index.
///
/// # Invariants
/// - `index[task.id()] == position` for every task in `tasks`.
/// - No two tasks share an id.
#[derive(Debug, Clone, Default)]
pub(crate) struct TaskTable {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
}

impl TaskTable {
    /// Builds a table from tasks already known to have unique ids.
    pub(crate) fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut table = Self {
            tasks,
            index: HashMap::new(),
        };
        table.reindex();
        table
    }

    pub(crate) fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn contains(&self, id: TaskId) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn get(&self, id: TaskId) -> Option<&Task> {
        self.index.get(&id).map(|&position| &self.tasks[position])
    }

    pub(crate) fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        let position = *self.index.get(&id)?;
        self.tasks.get_mut(position)
    }

    /// Appends a task. Returns `false` without inserting when the id exists.
    pub(crate) fn push(&mut self, task: Task) -> bool {
        if self.contains(task.id()) {
            return false;
        }
        self.index.insert(task.id(), self.tasks.len());
        self.tasks.push(task);
        true
    }

    pub(crate) fn remove(&mut self, id: TaskId) -> Option<Task> {
        let position = self.index.remove(&id)?;
        let removed = self.tasks.remove(position);
        self.reindex();
        Some(removed)
    }

    fn reindex(&mut self) {
        self.index = self
            .tasks
            .iter()
            .enumerate()
            .map(|(position, task)| (task.id(), position))
            .collect();
    }
}
