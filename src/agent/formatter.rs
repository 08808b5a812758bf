//! Response formatting
//!
//! Renders a [`ToolResult`] as a short conversational reply. Pure over
//! its inputs, so formatting the same result twice yields the same
//! string.

use crate::core::types::{ErrorCode, Intent, Task, ToolData, ToolResult};

/// Upper bound on tasks rendered in a LIST reply
const LIST_PREVIEW_LIMIT: usize = 10;

/// Format a tool result into a natural language reply
///
/// UNKNOWN never reaches a tool, so it always maps to the fixed
/// guidance string regardless of the result payload.
pub fn format_response(intent: Intent, result: &ToolResult) -> String {
    if intent == Intent::Unknown {
        return "I can only help with task management. Try 'create a task' or 'show my tasks'."
            .to_string();
    }

    if !result.success {
        let code = result.error_code.unwrap_or(ErrorCode::InternalError);
        let detail = result.error.as_deref().unwrap_or("An error occurred");
        return format_error(code, detail);
    }

    match (intent, &result.data) {
        (Intent::Create, Some(ToolData::Task { task, .. })) => format_create(task),
        (Intent::List, Some(ToolData::Tasks { tasks, count })) => format_list(tasks, *count),
        (Intent::Complete, Some(ToolData::Task { task, .. })) => format_complete(task),
        (Intent::Update, Some(ToolData::Task { task, old_title })) => {
            format_update(task, old_title.as_deref())
        }
        (Intent::Delete, Some(ToolData::Task { task, .. })) => {
            format!("Deleted task '{}'", task.title)
        }
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

fn format_create(task: &Task) -> String {
    let mut details = Vec::new();
    if let Some(priority) = task.priority {
        details.push(format!("priority: {priority}"));
    }
    if let Some(due) = task.due_date {
        details.push(format!("due: {}", due.format("%Y-%m-%d")));
    }

    if details.is_empty() {
        format!("Task created: {}", task.title)
    } else {
        format!("Task created: {} ({})", task.title, details.join(", "))
    }
}

fn format_list(tasks: &[Task], count: usize) -> String {
    if count == 0 {
        return "You have no tasks".to_string();
    }

    let preview = tasks
        .iter()
        .take(LIST_PREVIEW_LIMIT)
        .enumerate()
        .map(|(i, task)| {
            let status = if task.completed { "✓" } else { "" };
            format!("{}) {}{}", i + 1, status, task.title)
        })
        .collect::<Vec<_>>()
        .join(" ");

    if count > LIST_PREVIEW_LIMIT {
        format!("You have {count} tasks: {preview} (showing first 10)")
    } else {
        let plural = if count == 1 { "" } else { "s" };
        format!("You have {count} task{plural}: {preview}")
    }
}

fn format_complete(task: &Task) -> String {
    if task.completed {
        format!("Marked '{}' as done", task.title)
    } else {
        format!("Marked '{}' as not done", task.title)
    }
}

fn format_update(task: &Task, old_title: Option<&str>) -> String {
    match old_title {
        Some(old) if old != task.title => format!("Updated '{}' to '{}'", old, task.title),
        _ if !task.title.is_empty() => format!("Updated task '{}'", task.title),
        _ => format!("Updated task {}", task.id),
    }
}

fn format_error(code: ErrorCode, detail: &str) -> String {
    match code {
        ErrorCode::TaskNotFound => {
            "I couldn't find that task. Try listing your tasks first.".to_string()
        }
        ErrorCode::ValidationError => format!("Invalid input: {detail}"),
        ErrorCode::DatabaseError => "Something went wrong. Please try again.".to_string(),
        ErrorCode::InternalError => "An error occurred. Please try again.".to_string(),
        ErrorCode::InvalidUserId => "User authentication failed. Please log in again.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}
