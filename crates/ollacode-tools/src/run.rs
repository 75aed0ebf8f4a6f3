//! Run tool - execute shell commands.
//!
//! Commands pass the command filter, then the operator's confirmation, then
//! run through the platform shell in the project root with:
//! - stdin closed, so nothing can wait on input
//! - a wall-clock timeout (the child is killed on drop)
//! - non-interactive environment hints

use crate::args::required_str;
use crate::{Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{info, warn};

/// Execute a shell command after filtering and confirmation.
pub struct RunCommandTool;

#[async_trait]
impl Tool for RunCommandTool {
    fn id(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Run a shell command in the project root and capture its output. \
         The user must approve every command; destructive commands are refused."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["command"],
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute"
                }
            }
        })
    }

    fn example_args(&self) -> Value {
        json!({"command": "npm test"})
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let command = required_str(&args, "command")?;

        let decision = ctx.filter.decide(command);
        if !decision.allowed {
            return Err(ToolError::Blocked(command.to_string()));
        }

        if !ctx.confirmer.confirm(command).await {
            info!(command = %command, "Command declined by operator");
            return Err(ToolError::Cancelled);
        }

        let run = execute_shell(command, ctx.root_dir(), ctx.command_timeout).await?;

        info!(command = %command, exit_code = run.exit_code, "Command finished");

        Ok(ToolOutput::new(json!({
            "command": command,
            "exitCode": run.exit_code,
            "stdout": run.stdout,
            "stderr": run.stderr,
        }))
        .with_success(run.exit_code == 0))
    }
}

struct ShellRun {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

async fn execute_shell(command: &str, workdir: &Path, timeout: Duration) -> ToolResult<ShellRun> {
    let mut cmd = shell_command(command);
    cmd.current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Keep tools from paging, prompting or colorizing
    cmd.env("TERM", "dumb");
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    cmd.env("NO_COLOR", "1");

    let mut child = cmd
        .spawn()
        .map_err(|e| ToolError::execution_failed(format!("Failed to spawn process: {e}")))?;

    let result = tokio::time::timeout(timeout, async {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let stdout_handle = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut stdout) = stdout {
                stdout.read_to_end(&mut buf).await.ok();
            }
            buf
        });

        let stderr_handle = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                stderr.read_to_end(&mut buf).await.ok();
            }
            buf
        });

        let status = child.wait().await?;

        let stdout_bytes = stdout_handle.await.unwrap_or_default();
        let stderr_bytes = stderr_handle.await.unwrap_or_default();

        Ok::<_, std::io::Error>((status, stdout_bytes, stderr_bytes))
    })
    .await;

    match result {
        Ok(Ok((status, stdout_bytes, stderr_bytes))) => Ok(ShellRun {
            exit_code: status.code().unwrap_or(-1),
            stdout: strip_final_newline(String::from_utf8_lossy(&stdout_bytes).into_owned()),
            stderr: strip_final_newline(String::from_utf8_lossy(&stderr_bytes).into_owned()),
        }),
        Ok(Err(e)) => Err(ToolError::execution_failed(format!("Process error: {e}"))),
        Err(_) => {
            warn!(
                command = %command,
                timeout_ms = timeout.as_millis() as u64,
                "Command timed out"
            );
            Err(ToolError::Timeout(timeout))
        }
    }
}

fn strip_final_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
