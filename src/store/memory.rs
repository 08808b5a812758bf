//! In-memory task store
//!
//! Reference implementation of [`TaskStore`] used by the REPL binary
//! and the test suite. State lives behind a mutex so the store can be
//! shared across concurrent requests.

use std::sync::Mutex;

use chrono::Utc;

use crate::core::types::Task;
use crate::store::{NewTask, StoreError, TaskChanges, TaskFilter, TaskStore};

#[derive(Default)]
struct Inner {
    next_id: u64,
    tasks: Vec<Task>,
}

/// Mutex-backed in-memory store. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }
}

impl TaskStore for MemoryStore {
    fn create(&self, owner: &str, new_task: NewTask) -> Result<Task, StoreError> {
        let mut inner = self.lock()?;
        inner.next_id += 1;
        let now = Utc::now();
        let task = Task {
            id: inner.next_id,
            owner: owner.to_string(),
            title: new_task.title,
            description: new_task.description,
            completed: false,
            priority: new_task.priority,
            due_date: new_task.due_date,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.push(task.clone());
        Ok(task)
    }

    fn list(&self, owner: &str, filter: TaskFilter) -> Result<Vec<Task>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .tasks
            .iter()
            .filter(|t| t.owner == owner)
            .filter(|t| filter.completed.map_or(true, |c| t.completed == c))
            .filter(|t| filter.priority.map_or(true, |p| t.priority == Some(p)))
            .cloned()
            .collect())
    }

    fn set_completed(&self, owner: &str, id: u64, completed: bool) -> Result<Task, StoreError> {
        let mut inner = self.lock()?;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner == owner)
            .ok_or(StoreError::NotFound)?;
        task.completed = completed;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    fn update(&self, owner: &str, id: u64, changes: TaskChanges) -> Result<Task, StoreError> {
        let mut inner = self.lock()?;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner == owner)
            .ok_or(StoreError::NotFound)?;
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = Some(description);
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    fn delete(&self, owner: &str, id: u64) -> Result<Task, StoreError> {
        let mut inner = self.lock()?;
        let pos = inner
            .tasks
            .iter()
            .position(|t| t.id == id && t.owner == owner)
            .ok_or(StoreError::NotFound)?;
        Ok(inner.tasks.remove(pos))
    }
}
