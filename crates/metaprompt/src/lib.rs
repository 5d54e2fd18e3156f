//! Core of the meta prompt playground: compare two system-role "meta prompts"
//! against the same test input and inspect what the model returns.
//!
//! `metaprompt` contains everything that is not tied to a particular frontend:
//! the chat completions client, the [`Completer`](completion::Completer)
//! seam used to invoke it, the `<reasoning>` splitter, the flat session file,
//! and the shared [`UiState`](ui::UiState) a frontend renders from.
//!
//! # Getting started
//!
//! ```ignore
//! use metaprompt::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let completer = PlaygroundConfig::default().build_completer()?;
//!
//!     let request = CompletionRequest::for_meta_prompt(DEFAULT_META_PROMPT, "Write haiku.");
//!     let text = completer.complete(&request).await?;
//!
//!     let split = SplitOutput::from_completion(&text);
//!     println!("{}", split.output);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`completion`] | [`Completer`](completion::Completer) trait, request construction, HTTP-backed completer |
//! | [`reasoning`] | `<reasoning>…</reasoning>` extraction |
//! | [`session`] | Seven-field session record and its JSON file |
//! | [`playground`] | Side A/B state, in-flight guards, generation driver |
//! | [`ui`] | Shared state for frontends plus tracing log capture |
//! | [`api`] | Retry with backoff |
//! | [`config`] | [`PlaygroundConfig`](config::PlaygroundConfig) defaults |

pub mod api;
pub mod completion;
pub mod config;
pub mod playground;
pub mod prelude;
pub mod prompt;
pub mod reasoning;
pub mod session;
pub mod ui;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

// ── Constants ──────────────────────────────────────────────────────

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model for generations.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// Environment variable the API key is read from unless configured otherwise.
pub const API_KEY_ENV: &str = "OPENROUTER_KEY";

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body. Unused optional fields are omitted from
/// serialization.
#[derive(Serialize, Debug, Default)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Clean return type from [`OpenRouterClient::chat`].
#[derive(Debug)]
pub struct ChatCompletion {
    pub content: Option<String>,
    pub usage: Option<UsageInfo>,
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for an OpenAI-compatible chat completions endpoint.
///
/// Defaults to OpenRouter; [`with_url`](Self::with_url) points it anywhere
/// that speaks the same wire format.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    /// Create a new client with the given API key and default headers.
    pub fn new(api_key: impl Into<String>) -> Result<Self, String> {
        Self::with_headers(
            api_key,
            "https://github.com/agenai/metaprompt-playground",
            "metaprompt-playground",
        )
    }

    /// Create a new client with custom Referer and X-Title headers.
    pub fn with_headers(
        api_key: impl Into<String>,
        referer: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("metaprompt/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            url: OPENROUTER_URL.to_string(),
            referer: referer.into(),
            title: title.into(),
        })
    }

    /// Send requests to a different chat completions URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// The endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a chat completion request.
    pub async fn chat(&self, body: &ChatRequest) -> Result<ChatCompletion, String> {
        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={:?}",
            body.model,
            body.messages.len(),
            body.max_tokens,
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("failed to read response: {e}"))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(format!("API HTTP {status}: {text}"));
        }

        let parsed: RawChatResponse =
            serde_json::from_str(&text).map_err(|e| format!("failed to parse response: {e}"))?;

        if let Some(err) = parsed.error {
            return Err(format!("API error: {}", err.message));
        }

        if let Some(ref usage) = parsed.usage {
            debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
                usage.total_tokens.unwrap_or(0),
            );
        }

        match parsed.choices.and_then(|c| c.into_iter().next()) {
            Some(c) => Ok(ChatCompletion {
                content: c.message.content,
                usage: parsed.usage,
                finish_reason: c.finish_reason,
            }),
            None => {
                debug!("LLM output: empty (no choices)");
                Ok(ChatCompletion {
                    content: None,
                    usage: parsed.usage,
                    finish_reason: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChatRequest {
        ChatRequest {
            model: "test-model".into(),
            messages: vec![Message::system("be terse"), Message::user("hi")],
            ..Default::default()
        }
    }

    #[test]
    fn message_constructors() {
        let sys = Message::system("hello");
        assert_eq!(sys.role, MessageRole::System);
        assert_eq!(sys.content, "hello");

        let user = Message::user("world");
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn chat_request_skips_unset_fields() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "system");
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("temperature").is_none());
        assert!(json.get("seed").is_none());
    }

    #[tokio::test]
    async fn chat_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"content":"hello there"},"finish_reason":"stop"}],
                    "usage":{"prompt_tokens":3,"completion_tokens":2,"total_tokens":5}}"#,
            )
            .create_async()
            .await;

        let client = OpenRouterClient::new("sk-test")
            .unwrap()
            .with_url(format!("{}/v1/chat/completions", server.url()));
        let completion = client.chat(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.content.as_deref(), Some("hello there"));
        assert_eq!(completion.finish_reason.as_deref(), Some("stop"));
        assert_eq!(completion.usage.unwrap().total_tokens, Some(5));
    }

    #[tokio::test]
    async fn chat_reports_http_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let client = OpenRouterClient::new("bad").unwrap().with_url(server.url());
        let err = client.chat(&request()).await.unwrap_err();
        assert!(err.contains("HTTP 401"), "got: {err}");
    }

    #[tokio::test]
    async fn chat_reports_body_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"error":{"message":"model not found"}}"#)
            .create_async()
            .await;

        let client = OpenRouterClient::new("k").unwrap().with_url(server.url());
        let err = client.chat(&request()).await.unwrap_err();
        assert_eq!(err, "API error: model not found");
    }

    #[tokio::test]
    async fn chat_without_choices_has_no_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = OpenRouterClient::new("k").unwrap().with_url(server.url());
        let completion = client.chat(&request()).await.unwrap();
        assert!(completion.content.is_none());
    }
}
