//! Side-by-side comparison state: two meta prompts (A and B) sharing one test
//! input, each with its own output and reasoning.
//!
//! A generation is split in two halves so the shared state is never locked
//! across the network call:
//!
//! ```text
//! begin_generation(side) ──▶ Completer::complete ──▶ finish_generation(side, result)
//!   (lock, mark busy)          (no lock held)          (lock, split, store, clear busy)
//! ```
//!
//! `begin_generation` refuses to start a second call for a side that is
//! already busy, so two generations can never race on the same output fields.

use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use crate::completion::{Completer, CompletionRequest};
use crate::prompt::{DEFAULT_META_PROMPT, EXAMPLE_TEST_INPUT};
use crate::reasoning::SplitOutput;
use crate::session::{AppliedKeys, Session, SessionFile};
use crate::ui::UiState;

/// One of the two compared meta prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::A, Side::B];

    pub fn label(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }

    fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which tab of a side's result pane is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputView {
    #[default]
    Output,
    Reasoning,
}

impl OutputView {
    pub fn toggled(self) -> Self {
        match self {
            OutputView::Output => OutputView::Reasoning,
            OutputView::Reasoning => OutputView::Output,
        }
    }
}

/// Per-side runtime state that is not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideState {
    /// A completion for this side is in flight.
    pub busy: bool,
    pub view: OutputView,
}

/// The comparison model behind every frontend.
#[derive(Debug, Clone)]
pub struct Playground {
    pub session: Session,
    sides: [SideState; 2],
}

impl Default for Playground {
    /// Both editors start from the default meta prompt.
    fn default() -> Self {
        Self::new(Session {
            prompt_a: DEFAULT_META_PROMPT.to_string(),
            prompt_b: DEFAULT_META_PROMPT.to_string(),
            ..Default::default()
        })
    }
}

impl Playground {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            sides: [SideState::default(); 2],
        }
    }

    // ── Field access ──

    pub fn prompt(&self, side: Side) -> &str {
        match side {
            Side::A => &self.session.prompt_a,
            Side::B => &self.session.prompt_b,
        }
    }

    pub fn prompt_mut(&mut self, side: Side) -> &mut String {
        match side {
            Side::A => &mut self.session.prompt_a,
            Side::B => &mut self.session.prompt_b,
        }
    }

    pub fn output(&self, side: Side) -> &str {
        match side {
            Side::A => &self.session.output_a,
            Side::B => &self.session.output_b,
        }
    }

    pub fn reasoning(&self, side: Side) -> &str {
        match side {
            Side::A => &self.session.reasoning_a,
            Side::B => &self.session.reasoning_b,
        }
    }

    pub fn test_input(&self) -> &str {
        &self.session.test_input
    }

    pub fn test_input_mut(&mut self) -> &mut String {
        &mut self.session.test_input
    }

    pub fn side(&self, side: Side) -> SideState {
        self.sides[side.index()]
    }

    pub fn is_busy(&self, side: Side) -> bool {
        self.sides[side.index()].busy
    }

    /// Text currently visible in a side's result pane.
    pub fn visible_result(&self, side: Side) -> &str {
        match self.side(side).view {
            OutputView::Output => self.output(side),
            OutputView::Reasoning => self.reasoning(side),
        }
    }

    fn set_result(&mut self, side: Side, split: SplitOutput) {
        let (output, reasoning) = match side {
            Side::A => (&mut self.session.output_a, &mut self.session.reasoning_a),
            Side::B => (&mut self.session.output_b, &mut self.session.reasoning_b),
        };
        *output = split.output;
        *reasoning = split.reasoning;
    }

    // ── Generation ──

    /// Mark `side` busy and snapshot the request to send.
    ///
    /// Returns `None` when a generation for `side` is already in flight.
    pub fn begin_generation(&mut self, side: Side) -> Option<CompletionRequest> {
        let state = &mut self.sides[side.index()];
        if state.busy {
            return None;
        }
        state.busy = true;
        Some(CompletionRequest::for_meta_prompt(
            self.prompt(side),
            &self.session.test_input,
        ))
    }

    /// Record the outcome of a generation started with
    /// [`begin_generation`](Self::begin_generation).
    ///
    /// Success splits the completion into output and reasoning and switches
    /// the side to its output view. Failure leaves both fields untouched and
    /// hands the error back.
    pub fn finish_generation(
        &mut self,
        side: Side,
        result: Result<String, String>,
    ) -> Result<(), String> {
        self.sides[side.index()].busy = false;
        let text = result?;
        self.set_result(side, SplitOutput::from_completion(&text));
        self.sides[side.index()].view = OutputView::Output;
        Ok(())
    }

    // ── Editing actions ──

    pub fn toggle_view(&mut self, side: Side) -> OutputView {
        let state = &mut self.sides[side.index()];
        state.view = state.view.toggled();
        state.view
    }

    pub fn reset_prompt(&mut self, side: Side) {
        *self.prompt_mut(side) = DEFAULT_META_PROMPT.to_string();
    }

    pub fn clear_output(&mut self, side: Side) {
        match side {
            Side::A => self.session.output_a.clear(),
            Side::B => self.session.output_b.clear(),
        }
    }

    pub fn clear_reasoning(&mut self, side: Side) {
        match side {
            Side::A => self.session.reasoning_a.clear(),
            Side::B => self.session.reasoning_b.clear(),
        }
    }

    /// Clear whatever the side's result pane is currently showing.
    pub fn clear_visible_result(&mut self, side: Side) {
        match self.side(side).view {
            OutputView::Output => self.clear_output(side),
            OutputView::Reasoning => self.clear_reasoning(side),
        }
    }

    pub fn clear_test_input(&mut self) {
        self.session.test_input.clear();
    }

    pub fn load_example_input(&mut self) {
        self.session.test_input = EXAMPLE_TEST_INPUT.to_string();
    }

    /// Merge a loaded session file. A side whose reasoning was loaded goes
    /// back to its output view.
    pub fn apply_session(&mut self, file: SessionFile) -> AppliedKeys {
        let applied = self.session.apply(file);
        if applied.reasoning_a {
            self.sides[Side::A.index()].view = OutputView::Output;
        }
        if applied.reasoning_b {
            self.sides[Side::B.index()].view = OutputView::Output;
        }
        applied
    }
}

/// Run one generation for `side` against the shared state.
///
/// Locks the state only to begin and to finish; the completion call itself
/// runs unlocked. Returns `false` when the side was already busy and nothing
/// was sent. Failures are reported through the status line and an alert.
pub async fn generate(state: &Arc<Mutex<UiState>>, completer: &dyn Completer, side: Side) -> bool {
    let request = {
        let Ok(mut s) = state.lock() else {
            return false;
        };
        match s.playground.begin_generation(side) {
            Some(request) => {
                s.status = format!("Generating {side}...");
                request
            }
            None => {
                warn!("Generation {side} already in progress");
                return false;
            }
        }
    };

    info!("Generating {side} ({} chars of user content)", request.user.len());
    let result = completer.complete(&request).await;

    let Ok(mut s) = state.lock() else {
        return true;
    };
    match s.playground.finish_generation(side, result) {
        Ok(()) => {
            let has_reasoning = !s.playground.reasoning(side).is_empty();
            info!("Generation {side} finished (reasoning: {has_reasoning})");
            s.status = format!("Generated {side}");
        }
        Err(e) => {
            error!("Generation {side} failed: {e}");
            s.status = format!("Generation {side} failed");
            s.alert = Some(crate::ui::Alert::new(
                "Generation Error",
                format!("Error generating {side}: {e}"),
            ));
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionFuture;
    use crate::prompt::TASK_LABEL;

    #[test]
    fn defaults_use_default_meta_prompt() {
        let pg = Playground::default();
        assert_eq!(pg.prompt(Side::A), DEFAULT_META_PROMPT);
        assert_eq!(pg.prompt(Side::B), DEFAULT_META_PROMPT);
        assert!(pg.test_input().is_empty());
        assert_eq!(pg.side(Side::A), SideState::default());
    }

    #[test]
    fn begin_generation_guards_busy_side() {
        let mut pg = Playground::new(Session {
            prompt_a: "meta a".into(),
            prompt_b: "meta b".into(),
            test_input: "input".into(),
            ..Default::default()
        });

        let req = pg.begin_generation(Side::A).unwrap();
        assert_eq!(req.system, "meta a");
        assert_eq!(req.user, format!("{TASK_LABEL}input"));
        assert!(pg.is_busy(Side::A));

        assert!(pg.begin_generation(Side::A).is_none());
        // The other side is independent.
        assert!(pg.begin_generation(Side::B).is_some());
    }

    #[test]
    fn finish_generation_splits_and_shows_output() {
        let mut pg = Playground::default();
        pg.toggle_view(Side::B);
        pg.begin_generation(Side::B).unwrap();

        pg.finish_generation(
            Side::B,
            Ok("<reasoning>step one\nstep two</reasoning>Final answer.".into()),
        )
        .unwrap();

        assert!(!pg.is_busy(Side::B));
        assert_eq!(pg.output(Side::B), "Final answer.");
        assert_eq!(pg.reasoning(Side::B), "step one\nstep two");
        assert_eq!(pg.side(Side::B).view, OutputView::Output);
        assert!(pg.output(Side::A).is_empty());
    }

    #[test]
    fn failed_generation_keeps_previous_result() {
        let mut pg = Playground::default();
        pg.begin_generation(Side::A).unwrap();
        pg.finish_generation(Side::A, Ok("old".into())).unwrap();

        pg.begin_generation(Side::A).unwrap();
        let err = pg
            .finish_generation(Side::A, Err("API HTTP 429: slow down".into()))
            .unwrap_err();
        assert!(err.contains("429"));
        assert_eq!(pg.output(Side::A), "old");
        assert!(!pg.is_busy(Side::A), "guard must be released on failure");
    }

    #[test]
    fn clearing_follows_visible_view() {
        let mut pg = Playground::default();
        pg.begin_generation(Side::A).unwrap();
        pg.finish_generation(Side::A, Ok("<reasoning>r</reasoning>o".into()))
            .unwrap();

        assert_eq!(pg.toggle_view(Side::A), OutputView::Reasoning);
        assert_eq!(pg.visible_result(Side::A), "r");
        pg.clear_visible_result(Side::A);
        assert!(pg.reasoning(Side::A).is_empty());
        assert_eq!(pg.output(Side::A), "o");
    }

    #[test]
    fn reset_example_and_clear() {
        let mut pg = Playground::default();
        pg.prompt_mut(Side::A).push_str(" edited");
        pg.reset_prompt(Side::A);
        assert_eq!(pg.prompt(Side::A), DEFAULT_META_PROMPT);

        pg.load_example_input();
        assert_eq!(pg.test_input(), EXAMPLE_TEST_INPUT);
        pg.clear_test_input();
        assert!(pg.test_input().is_empty());
    }

    #[test]
    fn loading_reasoning_resets_view() {
        let mut pg = Playground::default();
        pg.toggle_view(Side::A);
        pg.toggle_view(Side::B);
        pg.apply_session(crate::session::parse_session(r#"{"reasoning_a": "x"}"#).unwrap());
        assert_eq!(pg.side(Side::A).view, OutputView::Output);
        assert_eq!(pg.side(Side::B).view, OutputView::Reasoning);
        assert_eq!(pg.reasoning(Side::A), "x");
    }

    struct Echo;

    impl Completer for Echo {
        fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
            Box::pin(async move { Ok(format!("<reasoning>{}</reasoning>done", request.system)) })
        }
    }

    struct Failing;

    impl Completer for Failing {
        fn complete<'a>(&'a self, _request: &'a CompletionRequest) -> CompletionFuture<'a> {
            Box::pin(async { Err("request failed: connection refused".to_string()) })
        }
    }

    #[tokio::test]
    async fn generate_updates_shared_state() {
        let state = Arc::new(Mutex::new(UiState::default()));
        *state.lock().unwrap().playground.prompt_mut(Side::A) = "meta".into();

        assert!(generate(&state, &Echo, Side::A).await);

        let s = state.lock().unwrap();
        assert_eq!(s.playground.output(Side::A), "done");
        assert_eq!(s.playground.reasoning(Side::A), "meta");
        assert_eq!(s.status, "Generated A");
        assert!(s.alert.is_none());
    }

    #[tokio::test]
    async fn generate_skips_busy_side() {
        let state = Arc::new(Mutex::new(UiState::default()));
        state.lock().unwrap().playground.begin_generation(Side::B);

        assert!(!generate(&state, &Echo, Side::B).await);
        assert!(state.lock().unwrap().playground.output(Side::B).is_empty());
    }

    struct Silent;

    impl Completer for Silent {
        fn complete<'a>(&'a self, _request: &'a CompletionRequest) -> CompletionFuture<'a> {
            Box::pin(async { Ok(String::new()) })
        }
    }

    #[tokio::test]
    async fn empty_completion_clears_side() {
        let state = Arc::new(Mutex::new(UiState::default()));
        {
            let mut s = state.lock().unwrap();
            s.playground.begin_generation(Side::A).unwrap();
            s.playground
                .finish_generation(Side::A, Ok("<reasoning>stale why</reasoning>stale".into()))
                .unwrap();
        }

        assert!(generate(&state, &Silent, Side::A).await);

        let s = state.lock().unwrap();
        assert_eq!(s.playground.output(Side::A), "");
        assert_eq!(s.playground.reasoning(Side::A), "");
        assert_eq!(s.status, "Generated A");
        assert!(s.alert.is_none());
    }

    #[tokio::test]
    async fn generate_failure_raises_alert() {
        let state = Arc::new(Mutex::new(UiState::default()));

        assert!(generate(&state, &Failing, Side::A).await);

        let s = state.lock().unwrap();
        assert!(!s.playground.is_busy(Side::A));
        assert_eq!(s.status, "Generation A failed");
        let alert = s.alert.as_ref().unwrap();
        assert_eq!(alert.title, "Generation Error");
        assert!(alert.message.contains("connection refused"));
    }
}
