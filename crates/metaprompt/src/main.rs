//! Run one meta prompt against a task and print the completion.
//!
//! Reads the API key from the `OPENROUTER_KEY` environment variable (or the
//! variable named by `--api-key-env`).
//!
//! # Examples
//!
//! ```sh
//! # Task as an argument, built-in meta prompt
//! metaprompt "Write a system prompt for a SQL tutor"
//!
//! # Task from stdin, custom meta prompt
//! cat task.md | metaprompt --meta-prompt-file prompts/strict.md
//!
//! # Show the reasoning section separately (stderr)
//! metaprompt --split-reasoning "Summarize support tickets"
//!
//! # Talk to OpenAI directly
//! metaprompt --api-url https://api.openai.com/v1/chat/completions \
//!   --api-key-env OPENAI_API_KEY --model gpt-4o "Draft a code reviewer prompt"
//! ```

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use metaprompt::prelude::*;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Run one meta prompt against a task and print the completion.
#[derive(Parser)]
#[command(name = "metaprompt", version)]
struct Cli {
    /// Task, goal, or current prompt. Read from stdin when omitted.
    prompt: Option<String>,

    /// File holding the meta prompt (system message). Defaults to the built-in one.
    #[arg(long)]
    meta_prompt_file: Option<PathBuf>,

    /// Model to use for the completion
    #[arg(long, default_value = metaprompt::DEFAULT_MODEL)]
    model: String,

    /// Maximum tokens in the response (0 = provider default)
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

    /// Print the answer to stdout and the reasoning section to stderr
    #[arg(long)]
    split_reasoning: bool,

    /// Log request details to stderr
    #[arg(short, long)]
    verbose: bool,
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
            ..Default::default()
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn read_task(cli: &Cli) -> Result<String, String> {
    if let Some(prompt) = &cli.prompt {
        return Ok(prompt.trim().to_string());
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Enter your task or prompt (press Ctrl+D on a new line to finish):");
    }
    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    Ok(buf.trim().to_string())
}

fn read_meta_prompt(cli: &Cli) -> Result<String, String> {
    match &cli.meta_prompt_file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read meta prompt '{}': {e}", path.display())),
        None => Ok(DEFAULT_META_PROMPT.to_string()),
    }
}

/// Returns `None` when there was no input to send.
async fn run(cli: &Cli) -> Result<Option<String>, String> {
    let task = read_task(cli)?;
    if task.is_empty() {
        return Ok(None);
    }

    let meta_prompt = read_meta_prompt(cli)?;
    let completer = cli.config().build_completer()?;
    let request = CompletionRequest::for_meta_prompt(&meta_prompt, &task);

    tracing::info!("Sending task ({} chars) to {}", task.len(), completer.model());
    completer.complete(&request).await.map(Some)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }

    match run(&cli).await {
        Ok(Some(text)) if cli.split_reasoning => {
            let split = SplitOutput::from_completion(&text);
            if split.has_reasoning() {
                eprintln!("--- Reasoning ---\n{}\n-----------------", split.reasoning);
            }
            println!("{}", split.output);
        }
        Ok(Some(text)) => println!("{text}"),
        Ok(None) => println!("No input provided. Exiting."),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
