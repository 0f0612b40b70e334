//! OpenAI-compatible remediation backend
//!
//! Sends the flagged snapshot to a chat-completions endpoint with a
//! fault-injection instruction and returns the reply as the remediated
//! snapshot. The reply is stripped of markdown code fencing before use; the
//! gate must never present fenced markup as working code.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sive_gate::{Remediator, TransformError};
use sive_snapshot::Snapshot;

/// Instruction given to the model for every remediation request
const REMEDIATION_PROMPT: &str = "You are a programming tutor. The learner pasted a foreign \
solution instead of writing it. Reintroduce small, realistic faults into the code so the \
learner has to debug it again. Keep the structure of the original code as close as possible \
and make the faults subtle but challenging. Return only the code, with no commentary, no \
explanations of the faults, and no markdown fencing.";

/// Connection settings for the remediation backend
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Chat-completions endpoint
    pub endpoint: String,
    /// Model name sent with every request
    pub model: String,
    /// Bearer token; requests go out unauthenticated when absent
    pub api_key: Option<String>,
}

impl OpenAiConfig {
    /// Default endpoint and model, key taken from `OPENAI_API_KEY`
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
        }
    }

    /// With a different endpoint (e.g. a local OpenAI-compatible server)
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With a different model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With an explicit API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

/// Remediation transform backed by an OpenAI-compatible service
#[derive(Debug)]
pub struct OpenAiRemediator {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiRemediator {
    /// Create a remediator with the given configuration
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn request_body<'a>(&'a self, snapshot: &Snapshot) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: REMEDIATION_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!(
                        "Original code:\n{}\nModify it slightly and inject faults.",
                        snapshot.as_str()
                    ),
                },
            ],
        }
    }
}

#[async_trait]
impl Remediator for OpenAiRemediator {
    async fn remediate(&self, snapshot: &Snapshot) -> Result<Snapshot, TransformError> {
        let body = self.request_body(snapshot);
        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| TransformError::Unavailable(err.to_string()))?;

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|err| TransformError::Unavailable(err.to_string()))?;

        let content = reply
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or_default();
        let code = strip_code_fences(content);
        if code.is_empty() {
            return Err(TransformError::EmptyOutput);
        }

        tracing::debug!(model = %self.config.model, "remediated variant received");
        Ok(Snapshot::new(code))
    }
}

/// Remove a surrounding markdown code fence, if present
///
/// Accepts an optional language tag on the opening fence. Content without
/// fencing passes through trimmed.
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    // drop the language tag line, then the closing fence
    let body = match rest.split_once('\n') {
        Some((_tag, body)) => body,
        None => return String::new(),
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
        .to_string()
}
