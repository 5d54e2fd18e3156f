//! The completion invoker: one system message, one user message, one text back.
//!
//! Frontends talk to the model through the [`Completer`] trait so the
//! playground logic can be driven by a fake in tests. [`ChatCompleter`] is the
//! real implementation on top of [`OpenRouterClient`].

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::api::retry::{self, RetryConfig};
use crate::prompt::TASK_LABEL;
use crate::{ChatRequest, Message, OpenRouterClient};

/// Boxed future returned by [`Completer::complete`].
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;

/// Build the user-role content for a meta prompt.
///
/// Uses `test_input` when it has any non-whitespace content, otherwise falls
/// back to the meta prompt itself. Either way the text is prefixed with
/// [`TASK_LABEL`] and otherwise passed through as-is.
pub fn build_user_content(meta_prompt: &str, test_input: &str) -> String {
    let task = if test_input.trim().is_empty() {
        meta_prompt
    } else {
        test_input
    };
    format!("{TASK_LABEL}{task}")
}

/// A system instruction plus the user content sent with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

impl CompletionRequest {
    /// Request for `meta_prompt` exercised against `test_input`.
    pub fn for_meta_prompt(meta_prompt: &str, test_input: &str) -> Self {
        Self {
            system: meta_prompt.to_string(),
            user: build_user_content(meta_prompt, test_input),
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        vec![Message::system(&self.system), Message::user(&self.user)]
    }
}

/// Anything that can turn a [`CompletionRequest`] into completion text.
///
/// Implementations must propagate every transport or API failure as `Err`.
pub trait Completer: Send + Sync {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
}

/// Generation parameters applied to every request.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub model: String,
    /// `0` leaves the limit to the provider.
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

/// [`Completer`] backed by the chat completions API.
pub struct ChatCompleter {
    client: OpenRouterClient,
    params: GenerationParams,
    retry: RetryConfig,
}

impl ChatCompleter {
    pub fn new(client: OpenRouterClient, params: GenerationParams) -> Self {
        Self {
            client,
            params,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.params.model
    }

    fn chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        ChatRequest {
            model: self.params.model.clone(),
            messages: request.messages(),
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
            ..Default::default()
        }
    }
}

impl Completer for ChatCompleter {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(async move {
            let body = self.chat_request(request);
            let completion = retry::with_retry(&self.retry, || self.client.chat(&body)).await?;
            debug!(
                "completion finished: reason={}",
                completion.finish_reason.as_deref().unwrap_or("unknown")
            );
            // Missing content counts as an empty completion.
            Ok(completion.content.unwrap_or_default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_content_prefers_test_input() {
        assert_eq!(
            build_user_content("meta", "write a haiku"),
            "Task, Goal, or Current Prompt:\nwrite a haiku"
        );
    }

    #[test]
    fn blank_test_input_falls_back_to_meta_prompt() {
        assert_eq!(
            build_user_content("meta", "  \n\t"),
            "Task, Goal, or Current Prompt:\nmeta"
        );
        assert_eq!(build_user_content("meta", ""), format!("{TASK_LABEL}meta"));
    }

    #[test]
    fn test_input_is_not_trimmed() {
        assert!(build_user_content("m", " x \n").ends_with(" x \n"));
    }

    #[test]
    fn request_messages_are_system_then_user() {
        let req = CompletionRequest::for_meta_prompt("be precise", "");
        let messages = req.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "be precise");
        assert_eq!(messages[1].content, format!("{TASK_LABEL}be precise"));
    }

    fn completer(url: String) -> ChatCompleter {
        let client = OpenRouterClient::new("k").unwrap().with_url(url);
        ChatCompleter::new(
            client,
            GenerationParams {
                model: "openai/gpt-4o".into(),
                max_tokens: 0,
                temperature: None,
            },
        )
    }

    #[tokio::test]
    async fn chat_completer_sends_both_messages() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "openai/gpt-4o",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "Task, Goal, or Current Prompt:\nin"}
                ]
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"<reasoning>r</reasoning>out"}}]}"#)
            .create_async()
            .await;

        let request = CompletionRequest::for_meta_prompt("sys", "in");
        let text = completer(server.url()).complete(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "<reasoning>r</reasoning>out");
    }

    #[tokio::test]
    async fn chat_completer_passes_empty_content_through() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":""}}]}"#)
            .create_async()
            .await;

        let request = CompletionRequest::for_meta_prompt("sys", "");
        let text = completer(server.url()).complete(&request).await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn chat_completer_treats_null_content_as_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":null}}]}"#)
            .create_async()
            .await;

        let request = CompletionRequest::for_meta_prompt("sys", "");
        assert_eq!(completer(server.url()).complete(&request).await, Ok(String::new()));
    }

    #[tokio::test]
    async fn chat_completer_propagates_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let request = CompletionRequest::for_meta_prompt("sys", "");
        let err = completer(server.url()).complete(&request).await.unwrap_err();
        assert!(err.contains("HTTP 500"), "got: {err}");
    }
}
