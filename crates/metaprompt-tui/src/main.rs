//! Interactive meta prompt playground.
//!
//! Edit two meta prompts side by side, run both against the same test input,
//! and compare the answers and their reasoning. Reads the API key from the
//! `OPENROUTER_KEY` environment variable (or the variable named by
//! `--api-key-env`).
//!
//! # Examples
//!
//! ```sh
//! # Default model through OpenRouter
//! metaprompt-playground
//!
//! # Reopen a saved comparison
//! metaprompt-playground --session saved_prompts/email.json
//!
//! # Show debug logs in the log pane
//! metaprompt-playground --model anthropic/claude-sonnet-4 --log-level debug
//! ```

use std::path::PathBuf;
use std::process;
use std::sync::{Arc, Mutex};

use clap::Parser;
use metaprompt::prelude::*;
use metaprompt::session::DEFAULT_SESSION_DIR;
use metaprompt_tui::{Command, TuiConfig, spawn_tui};
use tokio::sync::mpsc;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Interactive meta prompt playground.
#[derive(Parser)]
#[command(name = "metaprompt-playground", version)]
struct Cli {
    /// Model to use for completions
    #[arg(long, default_value = metaprompt::DEFAULT_MODEL)]
    model: String,

    /// Maximum tokens per response (0 = provider default)
    #[arg(long, default_value_t = 0)]
    max_tokens: u32,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Chat completions endpoint
    #[arg(long, default_value = metaprompt::OPENROUTER_URL)]
    api_url: String,

    /// Environment variable holding the API key
    #[arg(long, default_value = metaprompt::API_KEY_ENV)]
    api_key_env: String,

    /// Retries for transient API failures
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Directory offered when saving and loading sessions
    #[arg(long, default_value = DEFAULT_SESSION_DIR)]
    session_dir: PathBuf,

    /// Session file to open at startup
    #[arg(long)]
    session: Option<PathBuf>,

    /// Most verbose level shown in the log pane
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

impl Cli {
    fn config(&self) -> PlaygroundConfig {
        PlaygroundConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            api_url: self.api_url.clone(),
            api_key_env: self.api_key_env.clone(),
            retries: self.retries,
            session_dir: self.session_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = cli.config();

    let completer: Arc<dyn Completer> = match config.build_completer() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let ui_state = Arc::new(Mutex::new(UiState::new(
        Playground::default(),
        config.model.clone(),
    )));

    // Set up tracing → TUI log buffer.
    let (tracing_layer, log_buffer) = UiTracingLayer::with_max_level(cli.log_level);
    tracing_subscriber::registry().with(tracing_layer).init();

    // A bad startup file shows up as a "Load Error" popup in the TUI.
    if let Some(path) = &cli.session {
        let _ = load_from(&ui_state, &with_json_extension(path.clone()));
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let tui_config = TuiConfig {
        commands: tx,
        session_dir: config.session_dir.clone(),
        log_buffer: Some(log_buffer),
    };
    let tui_handle = spawn_tui(ui_state.clone(), tui_config);
    tracing::info!("Playground ready, model {}", config.model);

    // The channel closes when the TUI thread exits and drops its sender.
    while let Some(command) = rx.recv().await {
        match command {
            Command::Generate(side) => {
                let state = ui_state.clone();
                let completer = completer.clone();
                tokio::spawn(async move {
                    generate(&state, completer.as_ref(), side).await;
                });
            }
        }
    }

    tui_handle.join().ok();
}
