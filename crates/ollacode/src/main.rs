//! Ollacode - local coding agent driven by Ollama models.
//!
//! This is the main entry point for the ollacode CLI.

mod commands;
mod ui;

use clap::Parser;
use commands::run_task;
use ollacode_core::Config;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "ollacode")]
#[command(
    author,
    version,
    about = "Local coding agent: reads, writes and runs commands in your project using an Ollama model",
    long_about = None
)]
struct Cli {
    /// Natural language description of the task to perform
    task: String,

    /// Model to use (overrides config and OLLAMA_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    debug: bool,

    /// Ollama server URL
    #[arg(long)]
    ollama_url: Option<String>,

    /// Maximum number of reasoning rounds
    #[arg(long)]
    max_iterations: Option<u32>,
}

impl Cli {
    /// Flags as the highest-precedence config layer.
    fn overrides(&self) -> Config {
        Config {
            ollama_base_url: self.ollama_url.clone(),
            model: self.model.clone(),
            max_iterations: self.max_iterations,
            debug: self.debug.then_some(true),
            command_timeout_ms: None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match run_task(&cwd, &cli.task, cli.overrides()).await {
        Ok(code) => Ok(code),
        Err(e) => {
            tracing::error!(error = %e, "Unexpected error");
            ui::display::error(&format!("Unexpected error: {e:#}"));
            Ok(ExitCode::FAILURE)
        }
    }
}
