//! Playground configuration with sensible defaults.
//!
//! [`PlaygroundConfig`] captures what both binaries need to talk to the
//! model and where sessions are saved, and turns it into a ready
//! [`ChatCompleter`] via [`build_completer`](PlaygroundConfig::build_completer).

use std::path::PathBuf;

use crate::api::retry::RetryConfig;
use crate::completion::{ChatCompleter, GenerationParams};
use crate::session::DEFAULT_SESSION_DIR;
use crate::{API_KEY_ENV, DEFAULT_MODEL, OPENROUTER_URL, OpenRouterClient};

/// Configuration for a playground session.
#[derive(Debug, Clone)]
pub struct PlaygroundConfig {
    /// Model identifier. Default: `"openai/gpt-4o"`.
    pub model: String,
    /// Maximum tokens per completion, `0` for the provider default. Default: `0`.
    pub max_tokens: u32,
    /// Sampling temperature, `None` for the provider default. Default: `None`.
    pub temperature: Option<f32>,
    /// Chat completions endpoint. Default: OpenRouter.
    pub api_url: String,
    /// Environment variable holding the API key. Default: `"OPENROUTER_KEY"`.
    pub api_key_env: String,
    /// Retries for transient API failures. Default: `0`.
    pub retries: u32,
    /// Directory offered for save and load. Default: `"saved_prompts"`.
    pub session_dir: PathBuf,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 0,
            temperature: None,
            api_url: OPENROUTER_URL.to_string(),
            api_key_env: API_KEY_ENV.to_string(),
            retries: 0,
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
        }
    }
}

impl PlaygroundConfig {
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Read the API key from [`api_key_env`](Self::api_key_env).
    pub fn api_key(&self) -> Result<String, String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(format!(
                "{} environment variable is not set",
                self.api_key_env
            )),
        }
    }

    /// Build a [`ChatCompleter`] with the key taken from the environment.
    pub fn build_completer(&self) -> Result<ChatCompleter, String> {
        self.build_completer_with_key(self.api_key()?)
    }

    pub fn build_completer_with_key(&self, api_key: String) -> Result<ChatCompleter, String> {
        let client = OpenRouterClient::new(api_key)?.with_url(&self.api_url);
        Ok(ChatCompleter::new(client, self.generation_params())
            .with_retry(RetryConfig::with_retries(self.retries)))
    }
}
