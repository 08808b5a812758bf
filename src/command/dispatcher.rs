//! Intent dispatch
//!
//! Routes a classified intent to the matching store operation and
//! captures the outcome as a [`ToolResult`]. Extracted parameters are
//! advisory, so everything is re-validated here before the store is
//! touched; store failures surface as generic error codes with the
//! detail logged server-side only.

use std::time::Instant;

use crate::command::resolver::TaskResolver;
use crate::core::config::AgentConfig;
use crate::core::types::{
    ErrorCode, Intent, IntentClassification, Parameters, ToolData, ToolResult,
};
use crate::store::{NewTask, StoreError, TaskChanges, TaskFilter, TaskStore};

/// Maximum accepted title length, matching the store contract
const MAX_TITLE_LEN: usize = 500;
/// Maximum accepted description length
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Dispatch a classified intent against the store
///
/// Every result carries an execution time of at least 1 ms. UNKNOWN
/// short-circuits without a store call; COMPLETE/UPDATE/DELETE resolve
/// their target first and report TASK_NOT_FOUND without touching the
/// store when resolution fails.
pub fn dispatch(
    store: &dyn TaskStore,
    config: &AgentConfig,
    owner: &str,
    classification: &IntentClassification,
) -> ToolResult {
    let started = Instant::now();
    let mut result = route(store, config, owner, classification);
    result.execution_time_ms = (started.elapsed().as_millis() as u64).max(1);
    result
}

fn route(
    store: &dyn TaskStore,
    config: &AgentConfig,
    owner: &str,
    classification: &IntentClassification,
) -> ToolResult {
    if owner.trim().is_empty() {
        return ToolResult::failure(
            None,
            ErrorCode::InvalidUserId,
            "User ID is required and cannot be empty",
        );
    }

    match (classification.intent, &classification.params) {
        (Intent::Unknown, _) => {
            ToolResult::failure(None, ErrorCode::UnknownIntent, "Unknown intent")
        }
        (
            Intent::Create,
            Parameters::Create {
                title,
                description,
                priority,
                due_date,
            },
        ) => create(store, owner, title, description, *priority, *due_date),
        (
            Intent::List,
            Parameters::List {
                completed,
                priority,
            },
        ) => list(store, owner, *completed, *priority),
        (
            Intent::Complete,
            Parameters::Complete {
                task_id,
                task_title,
                completed,
            },
        ) => complete(store, config, owner, *task_id, task_title.as_deref(), *completed),
        (
            Intent::Update,
            Parameters::Update {
                task_id,
                task_title,
                new_title,
                new_description,
            },
        ) => update(
            store,
            config,
            owner,
            *task_id,
            task_title.as_deref(),
            new_title.clone(),
            new_description.clone(),
        ),
        (
            Intent::Delete,
            Parameters::Delete {
                task_id,
                task_title,
            },
        ) => delete(store, config, owner, *task_id, task_title.as_deref()),
        // Intent and parameter variant disagree; nothing sane to do
        _ => ToolResult::failure(None, ErrorCode::InternalError, "Unsupported operation"),
    }
}

fn create(
    store: &dyn TaskStore,
    owner: &str,
    title: &str,
    description: &Option<String>,
    priority: Option<crate::core::types::Priority>,
    due_date: Option<chrono::DateTime<chrono::Utc>>,
) -> ToolResult {
    const TOOL: &str = "add_task";

    let title = title.trim();
    if title.is_empty() {
        return ToolResult::failure(Some(TOOL), ErrorCode::ValidationError, "Task title is required");
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return ToolResult::failure(
            Some(TOOL),
            ErrorCode::ValidationError,
            "Task title must be 500 characters or less",
        );
    }
    if let Some(desc) = description {
        if desc.chars().count() > MAX_DESCRIPTION_LEN {
            return ToolResult::failure(
                Some(TOOL),
                ErrorCode::ValidationError,
                "Task description must be 2000 characters or less",
            );
        }
    }

    match store.create(
        owner,
        NewTask {
            title: title.to_string(),
            description: description.clone(),
            priority,
            due_date,
        },
    ) {
        Ok(task) => ToolResult::success(
            TOOL,
            ToolData::Task {
                task,
                old_title: None,
            },
        ),
        Err(e) => store_failure(TOOL, e, "Failed to create task due to a database error"),
    }
}

fn list(
    store: &dyn TaskStore,
    owner: &str,
    completed: Option<bool>,
    priority: Option<crate::core::types::Priority>,
) -> ToolResult {
    const TOOL: &str = "list_tasks";

    match store.list(
        owner,
        TaskFilter {
            completed,
            priority,
        },
    ) {
        Ok(tasks) => {
            let count = tasks.len();
            ToolResult::success(TOOL, ToolData::Tasks { tasks, count })
        }
        Err(e) => store_failure(TOOL, e, "Failed to list tasks due to a database error"),
    }
}

fn complete(
    store: &dyn TaskStore,
    config: &AgentConfig,
    owner: &str,
    task_id: Option<u64>,
    task_title: Option<&str>,
    completed: bool,
) -> ToolResult {
    const TOOL: &str = "complete_task";

    let resolver = TaskResolver::new(store, config.fuzzy_match_threshold);
    let Some(id) = resolver.resolve(owner, task_id, task_title) else {
        return ToolResult::failure(Some(TOOL), ErrorCode::TaskNotFound, "Task not found");
    };

    match store.set_completed(owner, id, completed) {
        Ok(task) => ToolResult::success(
            TOOL,
            ToolData::Task {
                task,
                old_title: None,
            },
        ),
        Err(e) => store_failure(TOOL, e, "Failed to update task due to a database error"),
    }
}

fn update(
    store: &dyn TaskStore,
    config: &AgentConfig,
    owner: &str,
    task_id: Option<u64>,
    task_title: Option<&str>,
    new_title: Option<String>,
    new_description: Option<String>,
) -> ToolResult {
    const TOOL: &str = "update_task";

    let resolver = TaskResolver::new(store, config.fuzzy_match_threshold);
    let Some(id) = resolver.resolve(owner, task_id, task_title) else {
        return ToolResult::failure(Some(TOOL), ErrorCode::TaskNotFound, "Task not found");
    };

    if new_title.is_none() && new_description.is_none() {
        return ToolResult::failure(
            Some(TOOL),
            ErrorCode::ValidationError,
            "At least one of new_title or new_description must be provided",
        );
    }
    if let Some(title) = &new_title {
        if title.trim().is_empty() || title.chars().count() > MAX_TITLE_LEN {
            return ToolResult::failure(
                Some(TOOL),
                ErrorCode::ValidationError,
                "Task title must be between 1 and 500 characters",
            );
        }
    }
    if let Some(desc) = &new_description {
        if desc.chars().count() > MAX_DESCRIPTION_LEN {
            return ToolResult::failure(
                Some(TOOL),
                ErrorCode::ValidationError,
                "Task description must be 2000 characters or less",
            );
        }
    }

    match store.update(
        owner,
        id,
        TaskChanges {
            title: new_title,
            description: new_description,
        },
    ) {
        Ok(task) => ToolResult::success(
            TOOL,
            ToolData::Task {
                task,
                old_title: task_title.map(str::to_string),
            },
        ),
        Err(e) => store_failure(TOOL, e, "Failed to update task due to a database error"),
    }
}

fn delete(
    store: &dyn TaskStore,
    config: &AgentConfig,
    owner: &str,
    task_id: Option<u64>,
    task_title: Option<&str>,
) -> ToolResult {
    const TOOL: &str = "delete_task";

    let resolver = TaskResolver::new(store, config.fuzzy_match_threshold);
    let Some(id) = resolver.resolve(owner, task_id, task_title) else {
        return ToolResult::failure(Some(TOOL), ErrorCode::TaskNotFound, "Task not found");
    };

    match store.delete(owner, id) {
        Ok(task) => ToolResult::success(
            TOOL,
            ToolData::Task {
                task,
                old_title: None,
            },
        ),
        Err(e) => store_failure(TOOL, e, "Failed to delete task due to a database error"),
    }
}

/// Map a store error to a generic result; internal detail is logged,
/// never shown to the user
fn store_failure(tool: &'static str, error: StoreError, message: &str) -> ToolResult {
    match error {
        StoreError::NotFound => ToolResult::failure(
            Some(tool),
            ErrorCode::TaskNotFound,
            "Task not found or you don't have permission to access it",
        ),
        StoreError::Backend(detail) => {
            tracing::error!(tool, %detail, "store backend failure");
            ToolResult::failure(Some(tool), ErrorCode::DatabaseError, message)
        }
    }
}
