//! Argument extraction shared by the tools.

use crate::error::{ToolError, ToolResult};
use serde_json::Value;

/// A required, non-empty string argument.
pub fn required_str<'a>(args: &'a Value, key: &str) -> ToolResult<&'a str> {
    match args.get(key).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(invalid(key)),
    }
}

/// A required string argument that may be empty.
pub fn required_str_allow_empty<'a>(args: &'a Value, key: &str) -> ToolResult<&'a str> {
    args.get(key).and_then(Value::as_str).ok_or_else(|| invalid(key))
}

fn invalid(key: &str) -> ToolError {
    ToolError::validation(format!("Missing or invalid \"{}\" argument", key))
}
