//! Task repository - append-only task creation and listing

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::Task;
use crate::ports::RecordStore;

/// Typed facade over the tasks collection
pub struct TaskRepository<S> {
    store: Arc<S>,
    require_title: bool,
}

impl<S: RecordStore<Task>> TaskRepository<S> {
    /// Create a repository that accepts any title, including an empty one
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            require_title: false,
        }
    }

    /// Reject tasks whose title is empty or whitespace
    pub fn with_required_title(mut self, required: bool) -> Self {
        self.require_title = required;
        self
    }

    /// Every persisted task in stored order
    pub fn list_all(&self) -> Result<Vec<Task>> {
        self.store.load()
    }

    /// Create an unassigned task and persist it
    pub fn create(&self, title: &str, description: &str) -> Result<Task> {
        if self.require_title && title.trim().is_empty() {
            return Err(Error::validation("Title is required"));
        }

        let task = self.store.update(|tasks| {
            let task = Task::new(title, description);
            tasks.push(task.clone());
            Ok(task)
        })?;

        tracing::info!(task_id = %task.id, "created task");
        Ok(task)
    }

    /// Number of persisted tasks
    pub fn count(&self) -> Result<usize> {
        Ok(self.store.load()?.len())
    }
}
