//! Convenience re-exports for common `metaprompt` types.
//!
//! ```ignore
//! use metaprompt::prelude::*;
//! ```

// ── Client ──────────────────────────────────────────────────────────
pub use crate::{ChatRequest, Message, OpenRouterClient};

// ── Completion ──────────────────────────────────────────────────────
pub use crate::api::RetryConfig;
pub use crate::completion::{
    ChatCompleter, Completer, CompletionFuture, CompletionRequest, GenerationParams,
    build_user_content,
};
pub use crate::config::PlaygroundConfig;
pub use crate::prompt::{DEFAULT_META_PROMPT, EXAMPLE_TEST_INPUT, TASK_LABEL};

// ── Reasoning & sessions ────────────────────────────────────────────
pub use crate::reasoning::{SplitOutput, extract_reasoning, has_reasoning};
pub use crate::session::{Session, SessionFile, load_session, save_session, with_json_extension};

// ── Playground & UI state ───────────────────────────────────────────
pub use crate::playground::{OutputView, Playground, Side, SideState, generate};
pub use crate::ui::tracing::{LogBuffer, UiTracingLayer};
pub use crate::ui::{
    Alert, LogLevel, LogLine, UiState, dismiss_alert, load_from, save_to, set_status, show_alert,
};
