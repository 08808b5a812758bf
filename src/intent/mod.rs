//! Natural-language understanding pipeline
//!
//! Raw text -> casual-or-task decision -> intent match -> parameter
//! extraction. All rule-based and pure; the optional LLM fallback in
//! [`llm`] only runs when the rules give up.

pub mod casual;
pub mod context;
pub mod extract;
pub mod llm;
pub mod matcher;

use crate::core::config::AgentConfig;
use crate::core::types::{
    ClassificationMethod, HistoryEntry, IntentClassification,
};

pub use casual::{casual_reply, classify_conversational};
pub use llm::LlmClient;
pub use matcher::match_intent;

/// Run the rule-based classifier: match the intent, then extract its
/// parameter set
pub fn classify(
    message: &str,
    history: &[HistoryEntry],
    config: &AgentConfig,
) -> IntentClassification {
    let (intent, confidence) = matcher::match_intent(message);
    let params = extract::extract(intent, message, history, config);
    IntentClassification {
        intent,
        confidence,
        params,
        method: ClassificationMethod::RuleBased,
    }
}
