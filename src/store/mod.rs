//! Owner-scoped task store boundary
//!
//! The store is the crate's external collaborator: persistence lives
//! behind this trait so the pipeline never touches a database directly.
//! Every operation takes the owner id and must neither return nor
//! mutate another owner's record.

pub mod memory;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::types::{Priority, Task};

pub use memory::MemoryStore;

/// Errors surfaced by a task store
///
/// `NotFound` covers both a missing row and a row owned by someone
/// else; the dispatcher must not be able to tell the difference.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("task not found")]
    NotFound,

    #[error("backend failure: {0}")]
    Backend(String),
}

/// Fields for a new task. Tasks are always created incomplete.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Optional filters for listing tasks
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Owner-scoped CRUD operations over stored tasks
pub trait TaskStore: Send + Sync {
    /// Create a task for `owner`, always with `completed = false`
    fn create(&self, owner: &str, new_task: NewTask) -> Result<Task, StoreError>;

    /// List `owner`'s tasks, optionally filtered
    fn list(&self, owner: &str, filter: TaskFilter) -> Result<Vec<Task>, StoreError>;

    /// Set the completion flag of one of `owner`'s tasks
    fn set_completed(&self, owner: &str, id: u64, completed: bool) -> Result<Task, StoreError>;

    /// Update title and/or description of one of `owner`'s tasks
    fn update(&self, owner: &str, id: u64, changes: TaskChanges) -> Result<Task, StoreError>;

    /// Delete one of `owner`'s tasks, returning the removed record
    fn delete(&self, owner: &str, id: u64) -> Result<Task, StoreError>;
}
