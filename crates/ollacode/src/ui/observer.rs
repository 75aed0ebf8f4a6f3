//! Terminal view of an agent run.

use super::display;
use super::spinner::Spinner;
use super::stream::StreamRenderer;
use ollacode_core::AgentObserver;
use ollacode_tools::ActionResult;
use serde_json::Value;
use std::io::{Stdout, Write};

/// Renders rounds, streamed replies and tool activity.
pub struct TerminalObserver<W: Write = Stdout> {
    spinner: Spinner,
    renderer: StreamRenderer<W>,
}

impl TerminalObserver<Stdout> {
    pub fn new() -> Self {
        Self::with_renderer(StreamRenderer::stdout())
    }
}

impl Default for TerminalObserver<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalObserver<W> {
    pub fn with_renderer(renderer: StreamRenderer<W>) -> Self {
        Self {
            spinner: Spinner::new(),
            renderer,
        }
    }

    /// Tear down anything still on screen.
    pub fn finish(&mut self) {
        self.spinner.stop();
        if self.renderer.is_started() {
            self.renderer.finalize();
        }
    }
}

impl<W: Write + Send> AgentObserver for TerminalObserver<W> {
    fn on_round_start(&mut self, iteration: u32, max_iterations: u32) {
        tracing::debug!(iteration, max_iterations, "Round started");
        self.spinner.start("AI is thinking...");
    }

    fn on_token(&mut self, token: &str) {
        self.spinner.stop();
        self.renderer.process(token);
    }

    fn on_response_complete(&mut self, _response: &str) {
        self.spinner.stop();
        self.renderer.finalize();
    }

    fn on_tool_call(&mut self, name: &str, args: &Value) {
        display::tool_execution(name, args);
    }

    fn on_tool_result(&mut self, _name: &str, result: &ActionResult) {
        display::tool_result(result);
    }
}
