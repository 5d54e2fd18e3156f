//! Split a completion into its `<reasoning>…</reasoning>` section and the
//! remaining answer.
//!
//! Only the first delimited region counts. Content between the markers may
//! span lines and may be empty. When no region is present the input comes
//! back untouched; trimming only happens after a successful match.

use std::sync::LazyLock;

use regex::Regex;

static REASONING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<reasoning>(.*?)</reasoning>").expect("reasoning pattern is valid")
});

/// Extract the first reasoning section from `text`.
///
/// Returns `(reasoning, remainder)`:
/// - match: `reasoning` is the trimmed inner text, `remainder` is `text` with
///   the whole region (markers included) removed once, then trimmed;
/// - no match: `("", text)` with `text` unchanged;
/// - empty input: `("", "")`.
pub fn extract_reasoning(text: &str) -> (String, String) {
    if text.is_empty() {
        return (String::new(), String::new());
    }

    match REASONING_BLOCK.captures(text) {
        Some(caps) => {
            let reasoning = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let remainder = REASONING_BLOCK.replacen(text, 1, "").trim().to_string();
            (reasoning, remainder)
        }
        None => (String::new(), text.to_string()),
    }
}

/// Whether `text` contains a complete reasoning section.
pub fn has_reasoning(text: &str) -> bool {
    !text.is_empty() && REASONING_BLOCK.is_match(text)
}

/// A completion split into the answer and its reasoning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOutput {
    pub reasoning: String,
    pub output: String,
}

impl SplitOutput {
    pub fn from_completion(text: &str) -> Self {
        let (reasoning, output) = extract_reasoning(text);
        Self { reasoning, output }
    }

    pub fn has_reasoning(&self) -> bool {
        !self.reasoning.is_empty()
    }
}
