//! Extraction of action requests from model output.
//!
//! Two passes:
//! 1. fenced ```` ```json ```` blocks, in order
//! 2. only when the first pass found nothing, inline `{"tool": ..., "args": ...}`
//!    objects in the raw text
//!
//! Candidates that fail to parse or validate are dropped silently.

use serde_json::{json, Map, Value};
use std::sync::OnceLock;
use tracing::debug;

/// Name of the completion action.
pub const DONE_ACTION: &str = "done";

static FENCED_BLOCK: OnceLock<regex::Regex> = OnceLock::new();
static INLINE_OBJECT: OnceLock<regex::Regex> = OnceLock::new();

fn fenced_block() -> &'static regex::Regex {
    FENCED_BLOCK.get_or_init(|| {
        regex::Regex::new(r"```json\s*\n([\s\S]*?)\n```")
            .expect("Invalid regex pattern - this is a compile-time constant")
    })
}

fn inline_object() -> &'static regex::Regex {
    INLINE_OBJECT.get_or_init(|| {
        regex::Regex::new(r#"\{[\s\S]*?"tool"\s*:[\s\S]*?"args"\s*:[\s\S]*?\}"#)
            .expect("Invalid regex pattern - this is a compile-time constant")
    })
}

/// A structured instruction found in model output.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ActionRequest {
    /// Validate a decoded candidate: a non-empty string `tool` and an object
    /// `args`.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut object) = value else {
            return None;
        };
        let name = match object.remove("tool") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => return None,
        };
        let arguments = match object.remove("args") {
            Some(Value::Object(arguments)) => arguments,
            _ => return None,
        };
        Some(Self { name, arguments })
    }

    /// Canonical wire form, `{"tool": name, "args": {...}}`.
    pub fn to_wire(&self) -> Value {
        json!({
            "tool": self.name,
            "args": self.arguments,
        })
    }

    /// Arguments as a JSON value.
    pub fn args_value(&self) -> Value {
        Value::Object(self.arguments.clone())
    }

    pub fn is_done(&self) -> bool {
        self.name == DONE_ACTION
    }
}

/// All valid action requests in `text`, in textual order.
pub fn parse_actions(text: &str) -> Vec<ActionRequest> {
    let fenced: Vec<ActionRequest> = fenced_block()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|body| decode(body.as_str()))
        .collect();

    if !fenced.is_empty() {
        return fenced;
    }

    parse_inline(text)
}

/// Whether any request is `done`.
pub fn has_done(actions: &[ActionRequest]) -> bool {
    actions.iter().any(ActionRequest::is_done)
}

/// The `message` of the first `done` request, if it is a string.
pub fn done_message(actions: &[ActionRequest]) -> Option<String> {
    actions
        .iter()
        .find(|a| a.is_done())
        .and_then(|a| a.arguments.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn decode(candidate: &str) -> Option<ActionRequest> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => ActionRequest::from_value(value),
        Err(e) => {
            debug!(error = %e, "Discarding undecodable action candidate");
            None
        }
    }
}

/// Inline scan. The lazy pattern stops at the first `}`, which cuts objects
/// with nested `args` short; when that candidate does not decode, the
/// balanced object starting at the same brace is tried instead. If neither
/// decodes, scanning resumes one byte past that brace.
fn parse_inline(text: &str) -> Vec<ActionRequest> {
    let re = inline_object();
    let mut actions = Vec::new();
    let mut pos = 0;

    while let Some(m) = re.find_at(text, pos) {
        if let Some(action) = decode(m.as_str()) {
            actions.push(action);
            pos = m.end();
            continue;
        }

        let balanced = balanced_object_end(text, m.start())
            .and_then(|end| decode(&text[m.start()..end]).map(|action| (action, end)));
        match balanced {
            Some((action, end)) => {
                actions.push(action);
                pos = end;
            }
            // Stray brace: let the next `{` start its own candidate.
            None => pos = m.start() + 1,
        }
    }

    actions
}

/// Byte offset just past the `}` that closes the `{` at `start`, skipping
/// braces inside JSON strings.
fn balanced_object_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fenced(body: &str) -> String {
        format!("```json\n{}\n```", body)
    }

    #[test]
    fn test_fenced_blocks_in_order() {
        let text = format!(
            "First I'll read it.\n{}\nthen write.\n{}\n",
            fenced(r#"{"tool": "read_file", "args": {"path": "a.txt"}}"#),
            fenced(r#"{"tool": "write_file", "args": {"path": "b.txt", "content": "x"}}"#),
        );
        let actions = parse_actions(&text);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].name, "read_file");
        assert_eq!(actions[0].arguments["path"], "a.txt");
        assert_eq!(actions[1].name, "write_file");
    }

    #[test]
    fn test_malformed_block_skipped() {
        let text = format!(
            "{}\n{}",
            fenced(r#"{"tool": "read_file", "args": {"path": }"#),
            fenced(r#"{"tool": "done", "args": {"message": "ok"}}"#),
        );
        let actions = parse_actions(&text);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].name, "done");
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        for body in [
            r#"{"tool": "", "args": {}}"#,
            r#"{"tool": 3, "args": {}}"#,
            r#"{"tool": "read_file"}"#,
            r#"{"tool": "read_file", "args": null}"#,
            r#"{"tool": "read_file", "args": ["a"]}"#,
            r#"["tool", "args"]"#,
        ] {
            assert!(parse_actions(&fenced(body)).is_empty(), "accepted {body}");
        }
    }

    #[test]
    fn test_inline_fallback() {
        let text = r#"Sure. {"tool": "done", "args": {"message": "finished"}} That's it."#;
        let actions = parse_actions(text);
        assert_eq!(actions.len(), 1);
        assert_eq!(done_message(&actions).as_deref(), Some("finished"));
    }

    #[test]
    fn test_inline_handles_braces_in_strings() {
        let text = r#"{"tool": "write_file", "args": {"path": "a.js", "content": "if (x) { y(); }"}}"#;
        let actions = parse_actions(text);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].arguments["content"], "if (x) { y(); }");
    }

    #[test]
    fn test_inline_ignored_when_fenced_present() {
        let text = format!(
            "{}\n{}",
            r#"{"tool": "read_file", "args": {"path": "inline.txt"}}"#,
            fenced(r#"{"tool": "read_file", "args": {"path": "fenced.txt"}}"#),
        );
        let actions = parse_actions(&text);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].arguments["path"], "fenced.txt");
    }

    #[test]
    fn test_no_actions() {
        assert!(parse_actions("I am thinking about it.").is_empty());
        assert!(parse_actions("").is_empty());
        assert!(parse_actions("```json\nnot json\n```").is_empty());
    }

    #[test]
    fn test_reparse_of_wire_form_is_stable() {
        let text = format!(
            "{}\n{}",
            fenced(r#"{"tool": "run_command", "args": {"command": "npm test"}}"#),
            fenced(r#"{"tool": "write_file", "args": {"path": "a", "content": "{\n}"}}"#),
        );
        let actions = parse_actions(&text);
        for action in &actions {
            let rendered = fenced(&serde_json::to_string_pretty(&action.to_wire()).unwrap());
            assert_eq!(parse_actions(&rendered), vec![action.clone()]);
        }
    }

    #[test]
    fn test_done_helpers() {
        let actions = parse_actions(&format!(
            "{}\n{}",
            fenced(r#"{"tool": "read_file", "args": {"path": "a"}}"#),
            fenced(r#"{"tool": "done", "args": {"message": 5}}"#),
        ));
        assert!(has_done(&actions));
        assert_eq!(done_message(&actions), None);
        assert!(!has_done(&actions[..1]));
    }

    #[test]
    fn test_inline_after_unrelated_braces() {
        let text = r#"I'll use a closure like {x} here. {"tool": "read_file", "args": {"path": "a.txt"}}"#;
        let actions = parse_actions(text);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].name, "read_file");
        assert_eq!(actions[0].arguments["path"], "a.txt");
    }

    #[test]
    fn test_inline_after_unclosed_brace() {
        let text = r#"The set {a, b is open. {"tool": "done", "args": {"message": "ok"}}"#;
        let actions = parse_actions(text);
        assert_eq!(actions.len(), 1);
        assert_eq!(done_message(&actions).as_deref(), Some("ok"));
    }
}
