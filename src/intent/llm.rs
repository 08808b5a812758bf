//! Optional LLM fallback for ambiguous messages
//!
//! Rule-based matching covers the vast majority of traffic; when it
//! yields UNKNOWN and a client is configured, the message is handed to
//! an OpenAI-compatible chat API for a second opinion. The client is
//! an explicitly constructed, injected dependency - never module-level
//! state - so tests can run without it.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TaskmateError};
use crate::core::types::{
    ClassificationMethod, Intent, IntentClassification, Parameters, Priority,
};

const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Async client for an OpenAI-compatible chat completions API
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl LlmClient {
    /// Create a new client with explicit configuration
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
        }
    }

    /// Create a client from environment variables
    ///
    /// Required: LLM_API_KEY
    /// Optional: LLM_API_URL (defaults to the Gemini OpenAI-compatible
    /// endpoint), LLM_MODEL
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| TaskmateError::Llm("LLM_API_KEY not set".into()))?;
        let api_url = std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Ok(Self::new(api_key, api_url, model))
    }

    /// Send a completion request
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            messages: vec![
                Message {
                    role: "system".into(),
                    content: system.into(),
                },
                Message {
                    role: "user".into(),
                    content: user.into(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| TaskmateError::Llm(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TaskmateError::Llm(format!("API error: {}", error_text)));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| TaskmateError::Llm(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| TaskmateError::Llm("Empty response".into()))
    }

    /// Classify a message the rules could not place
    ///
    /// The reply is parsed into the same [`IntentClassification`] the
    /// rule-based path produces, tagged `LLM_FALLBACK`. Callers treat
    /// any error as "fallback unavailable" and keep the UNKNOWN
    /// classification.
    pub async fn classify(&self, message: &str) -> Result<IntentClassification> {
        let user_prompt = format!("USER MESSAGE:\n{}\n\nClassify this message into JSON:", message);
        let response = self.complete(CLASSIFY_SYSTEM_PROMPT, &user_prompt).await?;
        let json_str = extract_json(&response)?;
        let raw: RawClassification = serde_json::from_str(json_str).map_err(|e| {
            TaskmateError::Llm(format!(
                "Failed to parse classification: {} - Response: {}",
                e, response
            ))
        })?;
        Ok(raw.into_classification(message))
    }
}

/// Extract JSON object from an LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| TaskmateError::Llm("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| TaskmateError::Llm("No closing brace found in response".into()))?;
    Ok(&response[start..=end])
}

/// Flat JSON shape the model is asked to produce
#[derive(Debug, Deserialize)]
struct RawClassification {
    operation: Intent,
    confidence: f32,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    task_id: Option<u64>,
    #[serde(default)]
    task_title: Option<String>,
    #[serde(default)]
    new_title: Option<String>,
    #[serde(default)]
    new_description: Option<String>,
}

impl RawClassification {
    fn into_classification(self, message: &str) -> IntentClassification {
        let priority: Option<Priority> = self.priority.as_deref().and_then(|p| p.parse().ok());
        let params = match self.operation {
            Intent::Create => Parameters::Create {
                title: self.title.unwrap_or_else(|| message.trim().to_string()),
                description: self.description,
                priority,
                due_date: None,
            },
            Intent::List => Parameters::List {
                completed: self.completed,
                priority,
            },
            Intent::Complete => Parameters::Complete {
                task_id: self.task_id,
                task_title: self.task_title,
                completed: self.completed.unwrap_or(true),
            },
            Intent::Update => Parameters::Update {
                task_id: self.task_id,
                task_title: self.task_title,
                new_title: self.new_title,
                new_description: self.new_description,
            },
            Intent::Delete => Parameters::Delete {
                task_id: self.task_id,
                task_title: self.task_title,
            },
            Intent::Unknown => Parameters::None,
        };
        IntentClassification {
            intent: self.operation,
            confidence: self.confidence.clamp(0.0, 1.0),
            params,
            method: ClassificationMethod::LlmFallback,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// System prompt for fallback classification
const CLASSIFY_SYSTEM_PROMPT: &str = r#"You are classifying task-management requests.
Convert the user message into structured JSON.

AVAILABLE OPERATIONS:
- CREATE: Add a new task
- LIST: Show existing tasks
- COMPLETE: Mark a task done (or not done when undoing)
- UPDATE: Change a task's title or description
- DELETE: Remove a task
- UNKNOWN: Not a task-management request

OUTPUT FORMAT (JSON only, no explanation):
{
  "operation": "OPERATION",
  "confidence": 0.0-1.0,
  "title": "new task title or null",
  "description": "task description or null",
  "priority": "high|medium|low or null",
  "completed": true/false/null,
  "task_id": number or null,
  "task_title": "referenced task title or null",
  "new_title": "replacement title or null",
  "new_description": "replacement description or null"
}

Examples:
"jot down: call the plumber" -> {"operation": "CREATE", "confidence": 0.85, "title": "call the plumber", "description": null, "priority": null, "completed": null, "task_id": null, "task_title": null, "new_title": null, "new_description": null}
"anything left for today?" -> {"operation": "LIST", "confidence": 0.8, "title": null, "description": null, "priority": null, "completed": false, "task_id": null, "task_title": null, "new_title": null, "new_description": null}
"scratch the dentist one" -> {"operation": "DELETE", "confidence": 0.75, "title": null, "description": null, "priority": null, "completed": null, "task_id": null, "task_title": "dentist", "new_title": null, "new_description": null}
"#;
