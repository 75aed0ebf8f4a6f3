//! Incremental rendering of a streamed model reply.

use crossterm::style::Stylize;
use std::io::Write;

/// Writes tokens as they arrive, prefixed once per reply.
pub struct StreamRenderer<W: Write> {
    out: W,
    buffer: String,
    current_line: String,
    started: bool,
}

impl StreamRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> StreamRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buffer: String::new(),
            current_line: String::new(),
            started: false,
        }
    }

    /// Print one token.
    pub fn process(&mut self, token: &str) {
        if token.is_empty() {
            return;
        }
        if !self.started {
            let _ = write!(self.out, "\n{} ", "🤖".green());
            self.started = true;
        }
        let _ = write!(self.out, "{}", token);
        let _ = self.out.flush();

        self.buffer.push_str(token);
        match token.rfind('\n') {
            Some(pos) => self.current_line = token[pos + 1..].to_string(),
            None => self.current_line.push_str(token),
        }
    }

    /// End the reply and return everything written since the last call.
    pub fn finalize(&mut self) -> String {
        if !self.current_line.is_empty() {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
        }
        self.current_line.clear();
        self.started = false;
        std::mem::take(&mut self.buffer)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(renderer: &StreamRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.output().clone()).unwrap()
    }

    #[test]
    fn test_prefix_printed_once() {
        let mut renderer = StreamRenderer::new(Vec::new());
        renderer.process("Hello");
        renderer.process(", world");

        let out = written(&renderer);
        assert_eq!(out.matches("🤖").count(), 1);
        assert!(out.ends_with("Hello, world"));
    }

    #[test]
    fn test_finalize_adds_newline_and_returns_text() {
        let mut renderer = StreamRenderer::new(Vec::new());
        renderer.process("line one\nline");
        renderer.process(" two");

        let text = renderer.finalize();
        assert_eq!(text, "line one\nline two");
        assert!(written(&renderer).ends_with("line two\n"));
        assert!(!renderer.is_started());
    }

    #[test]
    fn test_finalize_skips_newline_after_complete_line() {
        let mut renderer = StreamRenderer::new(Vec::new());
        renderer.process("done\n");
        renderer.finalize();

        assert!(written(&renderer).ends_with("done\n"));
        assert!(!written(&renderer).ends_with("done\n\n"));
    }

    #[test]
    fn test_new_reply_gets_new_prefix() {
        let mut renderer = StreamRenderer::new(Vec::new());
        renderer.process("first");
        renderer.finalize();
        renderer.process("second");

        assert_eq!(written(&renderer).matches("🤖").count(), 2);
        assert_eq!(renderer.finalize(), "second");
    }

    #[test]
    fn test_empty_reply_writes_nothing() {
        let mut renderer = StreamRenderer::new(Vec::new());
        renderer.process("");
        assert_eq!(renderer.finalize(), "");
        assert!(written(&renderer).is_empty());
    }
}
