//! Read tool - read file contents.

use crate::args::required_str;
use crate::{Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::io::ErrorKind;
use tracing::debug;

/// Read a whole file as text.
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn id(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the full contents of a file. Paths are relative to the project root."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["path"],
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path relative to the project root"
                }
            }
        })
    }

    fn example_args(&self) -> Value {
        json!({"path": "src/index.js"})
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let path = required_str(&args, "path")?;
        let resolved = ctx.sandbox.resolve(path)?;

        let content = tokio::fs::read_to_string(&resolved)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ToolError::file_not_found(path),
                ErrorKind::PermissionDenied => ToolError::permission_denied(path),
                _ => ToolError::Io(e),
            })?;

        let size = content.chars().count();
        debug!(path = %resolved.display(), size, "Read file");

        Ok(ToolOutput::new(json!({
            "path": resolved.display().to_string(),
            "content": content,
            "size": size,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;

    #[tokio::test]
    async fn test_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "héllo").unwrap();
        let ctx = context(dir.path());

        let output = ReadFileTool
            .execute(json!({"path": "hello.txt"}), &ctx)
            .await
            .unwrap();

        assert!(output.success);
        assert_eq!(output.data["content"], "héllo");
        assert_eq!(output.data["size"], 5);
        assert_eq!(
            output.data["path"],
            dir.path().join("hello.txt").display().to_string()
        );
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let err = ReadFileTool
            .execute(json!({"path": "nope.txt"}), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "File not found: nope.txt");
    }

    #[tokio::test]
    async fn test_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let err = ReadFileTool
            .execute(json!({"path": 42}), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing or invalid \"path\" argument");
    }

    #[tokio::test]
    async fn test_sandbox_rejects_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "SECRET=1").unwrap();
        let ctx = context(dir.path());

        let err = ReadFileTool
            .execute(json!({"path": ".env"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Sandbox(_)));

        let err = ReadFileTool
            .execute(json!({"path": "../../etc/passwd"}), &ctx)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Access denied: Path is outside project directory."));
    }
}
