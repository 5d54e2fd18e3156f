//! Terminal playground for comparing two meta prompts side by side.
//!
//! Renders the [`UiState`] from `metaprompt` with ratatui + crossterm. The
//! TUI runs on its own OS thread and never awaits network work: generation
//! requests go out over a [`Command`] channel to the async runtime, which
//! writes results back into the shared state.
//!
//! # Quick start
//!
//! ```ignore
//! use metaprompt::prelude::*;
//! use metaprompt_tui::{Command, TuiConfig, spawn_tui};
//! use std::sync::{Arc, Mutex};
//!
//! let state = Arc::new(Mutex::new(UiState::default()));
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let handle = spawn_tui(state.clone(), TuiConfig::new(tx));
//! while let Some(Command::Generate(side)) = rx.recv().await {
//!     // spawn generate(&state, &completer, side)
//! }
//! handle.join().unwrap();
//! ```

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use metaprompt::playground::Side;
use metaprompt::session::DEFAULT_SESSION_DIR;
use metaprompt::ui::UiState;
use metaprompt::ui::tracing::LogBuffer;
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedSender;

mod app;
pub mod clipboard;
pub mod highlight;
mod input;
mod render;

pub use render::{log_level_style, truncate_str};

use app::App;
use input::handle_key_event;
use render::render;

/// Work the TUI hands to the async runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Generate a completion for one side.
    Generate(Side),
}

/// Configuration for the TUI.
pub struct TuiConfig {
    /// Where generation requests are sent.
    pub commands: UnboundedSender<Command>,
    /// Directory pre-filled in the save/load path prompt until a file has
    /// been saved or loaded.
    pub session_dir: PathBuf,
    /// Optional log buffer from the tracing layer, drained once per frame
    /// into `UiState::logs`.
    pub log_buffer: Option<LogBuffer>,
}

impl TuiConfig {
    pub fn new(commands: UnboundedSender<Command>) -> Self {
        Self {
            commands,
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            log_buffer: None,
        }
    }
}

/// Spawn the TUI on a dedicated OS thread.
///
/// The thread exits when the user quits; `quit_requested` is set on the
/// shared state at that point.
pub fn spawn_tui(state: Arc<Mutex<UiState>>, config: TuiConfig) -> JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(e) = run_tui(&state, &config) {
            eprintln!("TUI error: {e}");
        }
        if let Ok(mut s) = state.lock() {
            s.quit_requested = true;
        }
    })
}

/// Run the TUI event loop (blocking). Call this from a dedicated OS thread.
pub fn run_tui(state: &Arc<Mutex<UiState>>, config: &TuiConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut app = App::new();

    let result = event_loop(&mut terminal, &mut app, state, config);

    // Restore the terminal even when the loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    state: &Arc<Mutex<UiState>>,
    config: &TuiConfig,
) -> io::Result<()> {
    loop {
        let quit = state.lock().map(|s| s.quit_requested).unwrap_or(true);
        if app.should_quit || quit {
            return Ok(());
        }

        if let Some(ref log_buf) = config.log_buffer {
            log_buf.flush_into(state);
        }

        terminal.draw(|frame| render(frame, state, app))?;

        // Poll for input events (100ms timeout for responsive rendering).
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind != KeyEventKind::Release
        {
            handle_key_event(key, app, state, config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tui_config_defaults_to_session_dir() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let config = TuiConfig::new(tx);
        assert_eq!(config.session_dir, PathBuf::from("saved_prompts"));
        assert!(config.log_buffer.is_none());
    }

    #[test]
    fn app_defaults() {
        let app = App::new();
        assert!(!app.should_quit);
        assert!(!app.show_logs);
        assert_eq!(app.log_scroll, 0);
        assert_eq!(app.input_mode, app::InputMode::Normal);
        assert!(app.path_buffer.is_empty());
    }
}
