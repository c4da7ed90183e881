/// LLM client: the single point of entry for all model calls in Waypoint.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Generators depend on the `LanguageModel` trait and fall back to templates
/// whenever it returns an error.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::chat::ChatRole;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in Waypoint.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No language model configured")]
    Unavailable,
}

/// One turn of a conversation sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[cfg(test)]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Text generation backend. Carried in `AppState` as `Arc<dyn LanguageModel>`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    async fn complete(&self, system: &str, turns: &[ChatTurn]) -> Result<String, LlmError>;
}

/// Calls the model with a single user prompt and deserializes the reply as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn call_json<T: DeserializeOwned>(
    llm: &dyn LanguageModel,
    prompt: &str,
    system: &str,
) -> Result<T, LlmError> {
    let text = llm.complete(system, &[ChatTurn::user(prompt)]).await?;
    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(&text);
    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Calls the model with a single user prompt and returns trimmed text.
pub async fn call_text(
    llm: &dyn LanguageModel,
    prompt: &str,
    system: &str,
) -> Result<String, LlmError> {
    let text = llm.complete(system, &[ChatTurn::user(prompt)]).await?;
    let text = text.trim();
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(text.to_string())
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize, PartialEq)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client with retry on 429/5xx.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
        })
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, system: &str, turns: &[ChatTurn]) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: to_anthropic_messages(turns),
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    fn name(&self) -> &str {
        MODEL
    }

    async fn complete(&self, system: &str, turns: &[ChatTurn]) -> Result<String, LlmError> {
        let response = self.call(system, turns).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Stand-in used when no API key is configured. Every call fails with
/// `Unavailable`, so callers take their template path.
pub struct OfflineModel;

#[async_trait]
impl LanguageModel for OfflineModel {
    fn name(&self) -> &str {
        "offline"
    }

    async fn complete(&self, _system: &str, _turns: &[ChatTurn]) -> Result<String, LlmError> {
        Err(LlmError::Unavailable)
    }
}

/// The Messages API expects the conversation to open with a user turn and
/// roles to alternate; consecutive same-role turns are merged.
fn to_anthropic_messages(turns: &[ChatTurn]) -> Vec<AnthropicMessage> {
    let mut messages: Vec<AnthropicMessage> = Vec::with_capacity(turns.len());
    for turn in turns
        .iter()
        .skip_while(|t| t.role == ChatRole::Assistant)
        .filter(|t| !t.content.trim().is_empty())
    {
        let role = turn.role.as_str();
        match messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(&turn.content);
            }
            _ => messages.push(AnthropicMessage {
                role,
                content: turn.content.clone(),
            }),
        }
    }
    messages
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Test double that replays canned replies in order. `None` entries fail the call.
#[cfg(test)]
pub struct ScriptedModel {
    replies: std::sync::Mutex<std::collections::VecDeque<Option<String>>>,
    pub calls: std::sync::Mutex<Vec<(String, Vec<ChatTurn>)>>,
}

#[cfg(test)]
impl ScriptedModel {
    pub fn new(replies: Vec<Option<&str>>) -> Self {
        Self {
            replies: std::sync::Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string))
                    .collect(),
            ),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, system: &str, turns: &[ChatTurn]) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), turns.to_vec()));
        match self.replies.lock().unwrap().pop_front() {
            Some(Some(reply)) => Ok(reply),
            _ => Err(LlmError::Unavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_messages_merge_consecutive_roles_and_drop_leading_assistant() {
        let turns = vec![
            ChatTurn::assistant("hello, how can I help?"),
            ChatTurn::user("first"),
            ChatTurn::user("second"),
            ChatTurn::assistant("reply"),
        ];
        let messages = to_anthropic_messages(&turns);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "first\n\nsecond");
        assert_eq!(messages[1].role, "assistant");
    }

    #[tokio::test]
    async fn test_call_json_parses_fenced_reply() {
        let model = ScriptedModel::new(vec![Some("```json\n{\"n\": 3}\n```")]);
        #[derive(Deserialize)]
        struct N {
            n: u32,
        }
        let parsed: N = call_json(&model, "prompt", "system").await.unwrap();
        assert_eq!(parsed.n, 3);
    }

    #[tokio::test]
    async fn test_offline_model_is_unavailable() {
        let err = call_text(&OfflineModel, "hi", "sys").await.unwrap_err();
        assert!(matches!(err, LlmError::Unavailable));
    }

    #[tokio::test]
    async fn test_call_text_rejects_blank_reply() {
        let model = ScriptedModel::new(vec![Some("   ")]);
        let err = call_text(&model, "hi", "sys").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }
}
