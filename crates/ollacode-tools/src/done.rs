//! Done tool - signal task completion.

use crate::args::required_str;
use crate::{Tool, ToolContext, ToolOutput, ToolResult};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Marks the task as finished.
///
/// The agent loop intercepts `done` before dispatch; executing it directly
/// only validates and echoes the message.
pub struct DoneTool;

#[async_trait]
impl Tool for DoneTool {
    fn id(&self) -> &str {
        "done"
    }

    fn description(&self) -> &str {
        "Finish the task. Call this once the work is complete, with a short summary."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["message"],
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Summary of what was accomplished"
                }
            }
        })
    }

    fn example_args(&self) -> Value {
        json!({"message": "Created src/hello.js which prints a greeting"})
    }

    async fn execute(&self, args: Value, _ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let message = required_str(&args, "message")?;
        Ok(ToolOutput::new(json!({
            "message": message,
            "completed": true,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;

    #[tokio::test]
    async fn test_done_echoes_message() {
        let dir = tempfile::tempdir().unwrap();
        let output = DoneTool
            .execute(json!({"message": "All set"}), &context(dir.path()))
            .await
            .unwrap();
        assert_eq!(output.data, json!({"message": "All set", "completed": true}));
    }

    #[tokio::test]
    async fn test_done_requires_message() {
        let dir = tempfile::tempdir().unwrap();
        let err = DoneTool
            .execute(json!({}), &context(dir.path()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing or invalid \"message\" argument");
    }
}
