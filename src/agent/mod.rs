//! Conversational agent
//!
//! Front door for the whole pipeline: conversational screening, intent
//! classification (rules first, LLM fallback when configured), tool
//! dispatch, and reply formatting. Every turn produces a reply plus
//! metadata; internal failures never leak past the metadata.

pub mod formatter;

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

use crate::command::dispatch;
use crate::core::config::AgentConfig;
use crate::core::error::Result;
use crate::core::types::{HistoryEntry, Intent, ToolResult};
use crate::intent::{self, casual_reply, classify_conversational, LlmClient};
use crate::store::TaskStore;

/// Reply shown when a turn fails for an internal reason
const CONTAINED_ERROR_REPLY: &str =
    "Oops, something went wrong on my end! 😅 Could you try that again?";

/// One completed conversational turn
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub response: String,
    pub conversation_id: Uuid,
    pub metadata: ResponseMetadata,
}

/// Diagnostics for a turn; surfaced to callers, never to the user text
#[derive(Debug, Clone, Serialize)]
pub struct ResponseMetadata {
    pub intent: String,
    pub tool_called: Option<String>,
    pub confidence: f32,
    pub execution_time_ms: u64,
    pub error: Option<String>,
}

pub struct Agent {
    store: Arc<dyn TaskStore>,
    llm: Option<LlmClient>,
    config: AgentConfig,
}

impl Agent {
    pub fn new(store: Arc<dyn TaskStore>, config: AgentConfig) -> Self {
        Self {
            store,
            llm: None,
            config,
        }
    }

    /// Attach an LLM client used as a fallback classifier when the
    /// rule table comes back UNKNOWN
    pub fn with_llm(mut self, llm: LlmClient) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Process one user turn under a fresh conversation id
    pub async fn process(
        &self,
        owner: &str,
        message: &str,
        history: &[HistoryEntry],
    ) -> AgentResponse {
        self.process_with_conversation(owner, message, history, Uuid::new_v4())
            .await
    }

    /// Process one user turn, keeping the caller's conversation id
    pub async fn process_with_conversation(
        &self,
        owner: &str,
        message: &str,
        history: &[HistoryEntry],
        conversation_id: Uuid,
    ) -> AgentResponse {
        let started = Instant::now();
        match self.run_turn(owner, message, history).await {
            Ok((response, metadata)) => AgentResponse {
                response,
                conversation_id,
                metadata: ResponseMetadata {
                    execution_time_ms: elapsed_ms(started),
                    ..metadata
                },
            },
            Err(e) => {
                tracing::error!(error = %e, "turn failed");
                AgentResponse {
                    response: CONTAINED_ERROR_REPLY.to_string(),
                    conversation_id,
                    metadata: ResponseMetadata {
                        intent: "ERROR".to_string(),
                        tool_called: None,
                        confidence: 0.0,
                        execution_time_ms: elapsed_ms(started),
                        error: Some(e.to_string()),
                    },
                }
            }
        }
    }

    async fn run_turn(
        &self,
        owner: &str,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<(String, ResponseMetadata)> {
        if classify_conversational(message) {
            let reply = casual_reply(message);
            return Ok((
                reply.to_string(),
                ResponseMetadata {
                    intent: "CASUAL_CONVERSATION".to_string(),
                    tool_called: None,
                    confidence: 1.0,
                    execution_time_ms: 0,
                    error: None,
                },
            ));
        }

        let mut classification = intent::classify(message, history, &self.config);
        if classification.intent == Intent::Unknown {
            if let Some(llm) = &self.llm {
                match llm.classify(message).await {
                    Ok(fallback) => classification = fallback,
                    // Keep the rule verdict; the turn still answers
                    Err(e) => tracing::warn!(error = %e, "llm fallback failed"),
                }
            }
        }

        let result: ToolResult = dispatch(self.store.as_ref(), &self.config, owner, &classification);
        let response = formatter::format_response(classification.intent, &result);
        tracing::debug!(
            intent = classification.intent.as_str(),
            success = result.success,
            tool = ?result.tool_name,
            "turn dispatched"
        );

        Ok((
            response,
            ResponseMetadata {
                intent: classification.intent.as_str().to_string(),
                tool_called: result.tool_name.map(str::to_string),
                confidence: classification.confidence,
                execution_time_ms: 0,
                error: result.error.clone(),
            },
        ))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    (started.elapsed().as_millis() as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tokio::runtime::Runtime;

    fn agent() -> Agent {
        Agent::new(Arc::new(MemoryStore::new()), AgentConfig::default())
    }

    #[test]
    fn test_greeting_skips_dispatch() {
        let rt = Runtime::new().unwrap();
        let response = rt.block_on(agent().process("alice", "hello", &[]));
        assert_eq!(response.metadata.intent, "CASUAL_CONVERSATION");
        assert_eq!(response.metadata.confidence, 1.0);
        assert!(response.metadata.tool_called.is_none());
        assert!(response.metadata.execution_time_ms >= 1);
    }

    #[test]
    fn test_create_turn_end_to_end() {
        let rt = Runtime::new().unwrap();
        let agent = agent();
        let response = rt.block_on(agent.process("alice", "remind me to buy milk from the store", &[]));
        assert_eq!(response.response, "Task created: buy milk from the store");
        assert_eq!(response.metadata.intent, "CREATE");
        assert_eq!(response.metadata.tool_called.as_deref(), Some("add_task"));
    }

    #[test]
    fn test_unknown_without_llm_gives_guidance() {
        let rt = Runtime::new().unwrap();
        // Long enough to dodge the short-message casual rule, mentions
        // "task" so the chit-chat rules stand down, matches no pattern
        let response = rt.block_on(agent().process(
            "alice",
            "weather forecast for the task tomorrow please",
            &[],
        ));
        assert_eq!(
            response.response,
            "I can only help with task management. Try 'create a task' or 'show my tasks'."
        );
        assert_eq!(response.metadata.intent, "UNKNOWN");
    }

    #[test]
    fn test_conversation_id_is_preserved() {
        let rt = Runtime::new().unwrap();
        let id = Uuid::new_v4();
        let response =
            rt.block_on(agent().process_with_conversation("alice", "hello", &[], id));
        assert_eq!(response.conversation_id, id);
    }

    #[test]
    fn test_error_detail_stays_in_metadata() {
        let rt = Runtime::new().unwrap();
        // Empty owner trips the dispatcher's auth check
        let response = rt.block_on(agent().process("", "show my tasks", &[]));
        assert_eq!(
            response.response,
            "User authentication failed. Please log in again."
        );
        assert!(response.metadata.error.is_some());
    }
}
