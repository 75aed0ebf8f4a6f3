//! Write tool - create or overwrite files.

use crate::args::{required_str, required_str_allow_empty};
use crate::{Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::io::ErrorKind;
use tracing::info;

/// Write a file, creating parent directories as needed.
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn id(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Create a file or replace its contents. Missing parent directories are created."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["path", "content"],
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path relative to the project root"
                },
                "content": {
                    "type": "string",
                    "description": "The complete new contents of the file"
                }
            }
        })
    }

    fn example_args(&self) -> Value {
        json!({"path": "src/hello.js", "content": "console.log('Hello, world!');\n"})
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let path = required_str(&args, "path")?;
        let content = required_str_allow_empty(&args, "content")?;
        let resolved = ctx.sandbox.resolve(path)?;

        let map_err = |e: std::io::Error| {
            if e.kind() == ErrorKind::PermissionDenied {
                ToolError::permission_denied(path)
            } else if is_out_of_space(&e) {
                ToolError::execution_failed("No space left on device")
            } else {
                ToolError::Io(e)
            }
        };

        if let Some(parent) = resolved.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(map_err)?;
        }
        tokio::fs::write(&resolved, content).await.map_err(map_err)?;

        let size = content.len();
        info!(path = %resolved.display(), size, "Wrote file");

        Ok(ToolOutput::new(json!({
            "path": resolved.display().to_string(),
            "size": size,
            "message": format!("Successfully wrote {} bytes to {}", size, path),
        })))
    }
}

#[cfg(unix)]
fn is_out_of_space(e: &std::io::Error) -> bool {
    // ENOSPC
    e.raw_os_error() == Some(28)
}

#[cfg(windows)]
fn is_out_of_space(e: &std::io::Error) -> bool {
    // ERROR_HANDLE_DISK_FULL, ERROR_DISK_FULL
    matches!(e.raw_os_error(), Some(39) | Some(112))
}

#[cfg(not(any(unix, windows)))]
fn is_out_of_space(_e: &std::io::Error) -> bool {
    false
}
