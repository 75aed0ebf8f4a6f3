//! Operator confirmation before a command runs.

use async_trait::async_trait;
use crossterm::style::Stylize;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Asks someone whether a command may run.
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Return `true` to let `command` run.
    async fn confirm(&self, command: &str) -> bool;
}

/// Prompts on the terminal and reads the answer from `input`.
///
/// The reader lives as long as the confirmer, so input typed ahead of a
/// prompt is kept for the next one.
#[derive(Debug)]
pub struct TerminalConfirmer<R = BufReader<Stdin>> {
    input: Mutex<R>,
}

impl TerminalConfirmer<BufReader<Stdin>> {
    pub fn new() -> Self {
        Self::with_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl Default for TerminalConfirmer<BufReader<Stdin>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> TerminalConfirmer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn with_reader(reader: R) -> Self {
        Self {
            input: Mutex::new(reader),
        }
    }
}

#[async_trait]
impl<R> Confirmer for TerminalConfirmer<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn confirm(&self, command: &str) -> bool {
        let mut input = self.input.lock().await;
        let mut stdout = std::io::stdout();
        ask(&mut *input, &mut stdout, command).await
    }
}

/// Whether an answer counts as a yes.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

async fn ask<R, W>(reader: &mut R, out: &mut W, command: &str) -> bool
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "⚠️  Command execution requested:".yellow());
    let _ = writeln!(out, "{}", format!("   {}", command).cyan());
    let _ = writeln!(out);
    let _ = write!(out, "{}", "Proceed? (y/n) ".bold());
    let _ = out.flush();

    let mut answer = String::new();
    if let Err(e) = reader.read_line(&mut answer).await {
        warn!(error = %e, "Failed to read confirmation answer");
        answer.clear();
    }

    let confirmed = is_affirmative(&answer);
    debug!(command = %command, confirmed, "Command confirmation");
    if !confirmed {
        let _ = writeln!(out, "{}", "✗ Command execution cancelled".red());
    }
    confirmed
}
