//! The saved session: two meta prompts, their outputs and reasoning, and the
//! shared test input, stored as one flat JSON object.
//!
//! ```json
//! {
//!     "prompt_a": "...",
//!     "prompt_b": "...",
//!     "output_a": "...",
//!     "output_b": "...",
//!     "reasoning_a": "...",
//!     "reasoning_b": "...",
//!     "test_input": "..."
//! }
//! ```
//!
//! Every key is optional on read. A key that is present overwrites the
//! in-memory field; a missing key leaves it alone; unknown keys are ignored.
//! Loading is all-or-nothing: any read or parse failure leaves the session
//! untouched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Directory (relative to the working directory) offered for saves and loads.
pub const DEFAULT_SESSION_DIR: &str = "saved_prompts";

/// File extension for session files.
pub const SESSION_EXTENSION: &str = "json";

/// In-memory session record. All fields default to empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub prompt_a: String,
    pub prompt_b: String,
    pub output_a: String,
    pub output_b: String,
    pub reasoning_a: String,
    pub reasoning_b: String,
    pub test_input: String,
}

/// On-disk shape as read: each key may be absent (or `null`).
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SessionFile {
    pub prompt_a: Option<String>,
    pub prompt_b: Option<String>,
    pub output_a: Option<String>,
    pub output_b: Option<String>,
    pub reasoning_a: Option<String>,
    pub reasoning_b: Option<String>,
    pub test_input: Option<String>,
}

/// Which reasoning keys a [`Session::apply`] call found.
///
/// Frontends switch a side back to its output view whenever that side's
/// reasoning was loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedKeys {
    pub reasoning_a: bool,
    pub reasoning_b: bool,
}

impl Session {
    /// Overwrite the fields present in `file`, leaving the rest unchanged.
    pub fn apply(&mut self, file: SessionFile) -> AppliedKeys {
        let applied = AppliedKeys {
            reasoning_a: file.reasoning_a.is_some(),
            reasoning_b: file.reasoning_b.is_some(),
        };

        let fields = [
            (&mut self.prompt_a, file.prompt_a),
            (&mut self.prompt_b, file.prompt_b),
            (&mut self.output_a, file.output_a),
            (&mut self.output_b, file.output_b),
            (&mut self.reasoning_a, file.reasoning_a),
            (&mut self.reasoning_b, file.reasoning_b),
            (&mut self.test_input, file.test_input),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }

        applied
    }
}

/// Parse session JSON. The top-level value must be an object and every
/// known key must hold a string (or `null`).
pub fn parse_session(json: &str) -> Result<SessionFile, String> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("invalid JSON: {e}"))?;
    if !value.is_object() {
        return Err("session file must contain a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| format!("invalid session field: {e}"))
}

/// Serialize a session as pretty JSON with four-space indentation.
pub fn to_json(session: &Session) -> Result<String, String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    session
        .serialize(&mut ser)
        .map_err(|e| format!("failed to serialize session: {e}"))?;
    String::from_utf8(buf).map_err(|e| format!("failed to serialize session: {e}"))
}

/// Read and parse a session file without touching any in-memory state.
pub fn read_session_file(path: &Path) -> Result<SessionFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
    parse_session(&content).map_err(|e| format!("failed to parse '{}': {e}", path.display()))
}

/// Load `path` into `session`. On error `session` is left as it was.
pub fn load_session(path: &Path, session: &mut Session) -> Result<AppliedKeys, String> {
    let file = read_session_file(path)?;
    let applied = session.apply(file);
    info!("Loaded session from {}", path.display());
    Ok(applied)
}

/// Write `session` to `path`.
///
/// Atomic write: serialize to a temp file in the same directory, then rename
/// into place. Parent directories are created as needed.
pub fn save_session(path: &Path, session: &Session) -> Result<(), String> {
    let json = to_json(session)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create '{}': {e}", parent.display()))?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| format!("'{}' is not a file path", path.display()))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, json)
        .map_err(|e| format!("failed to write '{}': {e}", tmp_path.display()))?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(format!("failed to write '{}': {e}", path.display()));
    }

    debug!("wrote session to {}", path.display());
    info!("Saved session to {}", path.display());
    Ok(())
}

/// Append `.json` when a user-supplied path has no extension.
pub fn with_json_extension(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(SESSION_EXTENSION)
    }
}
