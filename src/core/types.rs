//! Core type definitions used throughout the codebase

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored task record, owned by exactly one user
///
/// Tasks are created with `completed = false`; COMPLETE and UPDATE
/// operations bump `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub owner: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Classified task operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Create,
    List,
    Complete,
    Update,
    Delete,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Create => "CREATE",
            Intent::List => "LIST",
            Intent::Complete => "COMPLETE",
            Intent::Update => "UPDATE",
            Intent::Delete => "DELETE",
            Intent::Unknown => "UNKNOWN",
        }
    }
}

/// How a classification was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationMethod {
    RuleBased,
    LlmFallback,
}

/// Parameters extracted for a classified intent
///
/// Extraction is heuristic and total: every field is always present,
/// `None` where the message gave no signal. Values are advisory and
/// re-validated by the dispatcher before any store call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Parameters {
    Create {
        title: String,
        description: Option<String>,
        priority: Option<Priority>,
        due_date: Option<DateTime<Utc>>,
    },
    List {
        completed: Option<bool>,
        priority: Option<Priority>,
    },
    Complete {
        task_id: Option<u64>,
        task_title: Option<String>,
        completed: bool,
    },
    Update {
        task_id: Option<u64>,
        task_title: Option<String>,
        new_title: Option<String>,
        new_description: Option<String>,
    },
    Delete {
        task_id: Option<u64>,
        task_title: Option<String>,
    },
    None,
}

/// Result of intent classification. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    pub intent: Intent,
    /// Static property of the matched rule, surfaced for transparency
    /// only. Does not gate downstream behavior.
    pub confidence: f32,
    pub params: Parameters,
    pub method: ClassificationMethod,
}

/// Machine-readable error codes exchanged at the store boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidUserId,
    TaskNotFound,
    ValidationError,
    DatabaseError,
    InternalError,
    UnknownIntent,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidUserId => "INVALID_USER_ID",
            ErrorCode::TaskNotFound => "TASK_NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::UnknownIntent => "UNKNOWN_INTENT",
        }
    }
}

/// Payload carried by a successful tool invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ToolData {
    /// Single-task operations (create, complete, update, delete)
    Task {
        task: Task,
        /// Pre-update title, kept for response formatting
        old_title: Option<String>,
    },
    /// LIST operation
    Tasks { tasks: Vec<Task>, count: usize },
}

/// Structured outcome of a dispatched task-store operation
///
/// Produced once per dispatch, consumed once by the response formatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub tool_name: Option<&'static str>,
    pub success: bool,
    pub data: Option<ToolData>,
    pub error: Option<String>,
    pub error_code: Option<ErrorCode>,
    pub execution_time_ms: u64,
}

impl ToolResult {
    pub fn success(tool_name: &'static str, data: ToolData) -> Self {
        Self {
            tool_name: Some(tool_name),
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
            execution_time_ms: 0,
        }
    }

    pub fn failure(
        tool_name: Option<&'static str>,
        error_code: ErrorCode,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tool_name,
            success: false,
            data: None,
            error: Some(error.into()),
            error_code: Some(error_code),
            execution_time_ms: 0,
        }
    }
}

/// Speaker role in a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One prior conversation turn, used only for reference resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_serialization() {
        let json = serde_json::to_string(&Intent::Create).unwrap();
        assert_eq!(json, "\"CREATE\"");
        let intent: Intent = serde_json::from_str("\"COMPLETE\"").unwrap();
        assert_eq!(intent, Intent::Complete);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(" Medium ".parse::<Priority>(), Ok(Priority::Medium));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_error_code_round_trip() {
        let json = serde_json::to_string(&ErrorCode::TaskNotFound).unwrap();
        assert_eq!(json, "\"TASK_NOT_FOUND\"");
        assert_eq!(ErrorCode::TaskNotFound.as_str(), "TASK_NOT_FOUND");
    }

    #[test]
    fn test_tool_result_failure_carries_code() {
        let result = ToolResult::failure(Some("update_task"), ErrorCode::ValidationError, "bad");
        assert!(!result.success);
        assert_eq!(result.error_code, Some(ErrorCode::ValidationError));
        assert!(result.data.is_none());
    }
}
