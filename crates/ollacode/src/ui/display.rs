//! Terminal output for the run flow.
//!
//! Plain-text bodies are built by small pure functions so they can be tested
//! without a terminal; the printing helpers only add color.

use crossterm::style::Stylize;
use ollacode_tools::ActionResult;
use serde_json::Value;

const SEPARATOR_WIDTH: usize = 50;

/// Echo the operator's task.
pub fn user_task(task: &str) {
    println!("\n{} {}\n", "❯".cyan().bold(), task.cyan());
}

/// Announce a tool call before it runs.
pub fn tool_execution(name: &str, args: &Value) {
    println!("\n📝 {}: {}", name.yellow().bold(), args.to_string().dim());
}

/// Summary of a tool result, split by stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub ok: bool,
    pub summary: String,
    pub stderr: Option<String>,
}

impl ResultView {
    pub fn of(result: &ActionResult) -> Self {
        let data = result.payload.as_ref();
        let field = |key: &str| data.and_then(|d| d.get(key));

        if !result.ok {
            if let Some(error) = &result.error {
                return Self::failure(error.clone(), None);
            }
            if let Some(code) = field("exitCode").and_then(Value::as_i64) {
                let stderr = field("stderr")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
                return Self::failure(format!("Command exited with code {}", code), stderr);
            }
            return Self::failure("Tool execution failed".to_string(), None);
        }

        if let Some(message) = field("message").and_then(Value::as_str) {
            return Self::success(message.to_string(), None);
        }

        if let Some(content) = field("content").and_then(Value::as_str) {
            let size = field("size")
                .and_then(Value::as_u64)
                .unwrap_or_else(|| content.chars().count() as u64);
            return Self::success(format!("Read {} characters", size), None);
        }

        if let Some(stdout) = field("stdout").and_then(Value::as_str) {
            let stderr = field("stderr")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let summary = if stdout.is_empty() {
                "Command completed".to_string()
            } else {
                stdout.to_string()
            };
            return Self::success(summary, stderr);
        }

        Self::success("Done".to_string(), None)
    }

    fn success(summary: String, stderr: Option<String>) -> Self {
        Self {
            ok: true,
            summary,
            stderr,
        }
    }

    fn failure(summary: String, stderr: Option<String>) -> Self {
        Self {
            ok: false,
            summary,
            stderr,
        }
    }
}

/// Print what a tool call produced.
pub fn tool_result(result: &ActionResult) {
    let view = ResultView::of(result);
    if view.ok {
        println!("{} {}", "✓".green(), view.summary);
    } else {
        println!("{} {}", "✗".red(), view.summary.red());
    }
    if let Some(stderr) = view.stderr {
        eprintln!("{}", stderr.red());
    }
}

/// Print the closing line of a run.
pub fn final_result(success: bool, message: &str) {
    println!("\n{}", "─".repeat(SEPARATOR_WIDTH).dim());
    if success {
        println!("{} {}", "✓".green().bold(), message.green());
    } else {
        println!("{} {}", "✗".red().bold(), message.red());
    }
}

/// Setup steps shown when Ollama cannot be reached.
pub fn connection_help_text(url: &str) -> String {
    format!(
        "Failed to connect to Ollama at {url}\n\n\
         Please make sure:\n\
         1. Ollama is installed: https://ollama.ai\n\
         2. Ollama service is running\n\
         3. You have pulled a model: ollama pull qwen2.5-coder:7b"
    )
}

pub fn ollama_connection_help(url: &str) {
    let text = connection_help_text(url);
    let mut lines = text.lines();
    if let Some(headline) = lines.next() {
        eprintln!("{} {}", "✗".red().bold(), headline.red());
    }
    for line in lines {
        eprintln!("{}", line.yellow());
    }
}

pub fn model_not_found_text(model: &str) -> String {
    format!("Model not found: {model}\n\nPull it first:\n  ollama pull {model}")
}

pub fn model_not_found(model: &str) {
    let text = model_not_found_text(model);
    let mut lines = text.lines();
    if let Some(headline) = lines.next() {
        eprintln!("{} {}", "✗".red().bold(), headline.red());
    }
    for line in lines {
        eprintln!("{}", line.yellow());
    }
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(data: Value) -> ActionResult {
        ActionResult {
            ok: true,
            payload: Some(data),
            error: None,
        }
    }

    #[test]
    fn test_write_result_shows_message() {
        let view = ResultView::of(&ok(json!({
            "path": "a.txt",
            "size": 5,
            "message": "Successfully wrote 5 bytes to a.txt"
        })));
        assert!(view.ok);
        assert_eq!(view.summary, "Successfully wrote 5 bytes to a.txt");
    }

    #[test]
    fn test_read_result_shows_size() {
        let view = ResultView::of(&ok(json!({
            "path": "a.txt",
            "content": "héllo",
            "size": 5
        })));
        assert_eq!(view.summary, "Read 5 characters");
    }

    #[test]
    fn test_command_result_splits_streams() {
        let view = ResultView::of(&ok(json!({
            "command": "ls",
            "exitCode": 0,
            "stdout": "a.txt",
            "stderr": "warning"
        })));
        assert_eq!(view.summary, "a.txt");
        assert_eq!(view.stderr.as_deref(), Some("warning"));
    }

    #[test]
    fn test_command_without_output() {
        let view = ResultView::of(&ok(json!({
            "command": "true",
            "exitCode": 0,
            "stdout": "",
            "stderr": ""
        })));
        assert_eq!(view.summary, "Command completed");
        assert!(view.stderr.is_none());
    }

    #[test]
    fn test_other_success_is_done() {
        let view = ResultView::of(&ok(json!({ "completed": true })));
        assert_eq!(view.summary, "Done");
    }

    #[test]
    fn test_failure_uses_error() {
        let view = ResultView::of(&ActionResult::failure("File not found: x"));
        assert!(!view.ok);
        assert_eq!(view.summary, "File not found: x");
    }

    #[test]
    fn test_failed_command_shows_exit_code_and_stderr() {
        let view = ResultView::of(&ActionResult {
            ok: false,
            payload: Some(json!({
                "command": "ls missing",
                "exitCode": 2,
                "stdout": "",
                "stderr": "No such file or directory"
            })),
            error: None,
        });
        assert!(!view.ok);
        assert_eq!(view.summary, "Command exited with code 2");
        assert_eq!(view.stderr.as_deref(), Some("No such file or directory"));
    }

    #[test]
    fn test_failure_without_error_text() {
        let view = ResultView::of(&ActionResult {
            ok: false,
            payload: None,
            error: None,
        });
        assert_eq!(view.summary, "Tool execution failed");
    }

    #[test]
    fn test_help_texts() {
        let help = connection_help_text("http://localhost:11434");
        assert!(help.starts_with("Failed to connect to Ollama at http://localhost:11434"));
        assert!(help.contains("https://ollama.ai"));

        let missing = model_not_found_text("llama3");
        assert!(missing.starts_with("Model not found: llama3"));
        assert!(missing.contains("ollama pull llama3"));
    }
}
