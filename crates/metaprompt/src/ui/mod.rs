//! Shared UI state for playground frontends.
//!
//! Plain data and updaters only, no rendering dependencies.
//!
//! ```text
//! generation tasks ──writes──▶ Arc<Mutex<UiState>> ◀──reads/writes── UI frontend
//! ```
//!
//! Generation tasks (see [`playground::generate`](crate::playground::generate))
//! store results and status updates here; the frontend edits prompts, renders,
//! and runs save/load through the helpers below.

pub mod tracing;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::playground::Playground;
use crate::session::{self, AppliedKeys};

/// Maximum log lines kept in memory.
pub const MAX_LOG_LINES: usize = 2000;
/// Trim to this many when the cap is exceeded.
pub const LOG_TRIM_TO: usize = 1200;

// ── Log Types ─────────────────────────────────────────────────────────

/// A single log line captured from tracing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogLine {
    pub time: String,
    pub level: LogLevel,
    pub message: String,
}

/// Log severity level (mirrors tracing levels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Short fixed-width label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

// ── Alerts ────────────────────────────────────────────────────────────

/// A blocking error notification the frontend shows until dismissed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

// ── UiState ───────────────────────────────────────────────────────────

/// Core state shared between generation tasks and a frontend.
pub struct UiState {
    pub playground: Playground,
    /// Model label shown in the title bar.
    pub model: String,
    /// One-line status ("Ready", "Saved to ...", "Generation A failed").
    pub status: String,
    pub alert: Option<Alert>,
    /// Path of the last successful save or load.
    pub session_path: Option<PathBuf>,
    pub logs: Vec<LogLine>,
    /// The frontend sets this to `true` when the user requests quit.
    pub quit_requested: bool,
}

impl UiState {
    pub fn new(playground: Playground, model: impl Into<String>) -> Self {
        Self {
            playground,
            model: model.into(),
            ..Default::default()
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            playground: Playground::default(),
            model: String::new(),
            status: "Ready".into(),
            alert: None,
            session_path: None,
            logs: Vec::new(),
            quit_requested: false,
        }
    }
}

// ── Convenience Updaters ──────────────────────────────────────────────

/// Lock the shared state mutex and run a closure on the guard.
/// Silently ignores poisoned locks (no log spam inside UI frontends).
macro_rules! with_state {
    ($state:expr, |$s:ident| $body:block) => {
        if let Ok(mut $s) = $state.lock() {
            $body
        }
    };
}

/// Update the status line.
pub fn set_status(state: &Arc<Mutex<UiState>>, status: &str) {
    with_state!(state, |s| { s.status = status.to_string() });
}

/// Raise a blocking alert.
pub fn show_alert(state: &Arc<Mutex<UiState>>, title: &str, message: &str) {
    with_state!(state, |s| { s.alert = Some(Alert::new(title, message)) });
}

/// Dismiss the current alert, if any.
pub fn dismiss_alert(state: &Arc<Mutex<UiState>>) {
    with_state!(state, |s| { s.alert = None });
}

/// Save the current session to `path`.
///
/// The session is cloned under the lock and written without it. On failure
/// a "Save Error" alert is raised and the in-memory state is not modified.
pub fn save_to(state: &Arc<Mutex<UiState>>, path: &Path) -> Result<(), String> {
    let Some(snapshot) = state.lock().ok().map(|s| s.playground.session.clone()) else {
        return Err("state unavailable".to_string());
    };

    match session::save_session(path, &snapshot) {
        Ok(()) => {
            with_state!(state, |s| {
                s.status = format!("Saved to {}", path.display());
                s.session_path = Some(path.to_path_buf());
            });
            Ok(())
        }
        Err(e) => {
            ::tracing::error!("Save failed: {e}");
            show_alert(state, "Save Error", &format!("Error saving file: {e}"));
            Err(e)
        }
    }
}

/// Load `path` into the current session.
///
/// The file is read and validated before the lock is taken, so a missing or
/// malformed file leaves every field as it was and raises a "Load Error"
/// alert instead.
pub fn load_from(state: &Arc<Mutex<UiState>>, path: &Path) -> Result<AppliedKeys, String> {
    match session::read_session_file(path) {
        Ok(file) => {
            let mut applied = AppliedKeys::default();
            with_state!(state, |s| {
                applied = s.playground.apply_session(file);
                s.status = format!("Loaded from {}", path.display());
                s.session_path = Some(path.to_path_buf());
            });
            ::tracing::info!("Loaded session from {}", path.display());
            Ok(applied)
        }
        Err(e) => {
            ::tracing::error!("Load failed: {e}");
            show_alert(state, "Load Error", &format!("Error loading file: {e}"));
            Err(e)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
