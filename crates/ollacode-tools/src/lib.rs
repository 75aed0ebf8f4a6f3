//! Tool implementations for ollacode.
//!
//! The agent can ask for four actions: `read_file`, `write_file`,
//! `run_command` and `done`. Each is a [`Tool`]; the [`ToolDispatcher`]
//! routes a named request to its tool and folds every outcome, including
//! failures, into an [`ActionResult`] the model can read.

pub mod args;
pub mod dispatcher;
pub mod error;
pub mod registry;

// Tool implementations
pub mod done;
pub mod read;
pub mod run;
pub mod write;

pub use dispatcher::{ActionDispatcher, ToolDispatcher};
pub use error::{ToolError, ToolResult};
pub use registry::ToolRegistry;

use async_trait::async_trait;
use ollacode_sandbox::{CommandFilter, Confirmer, PathSandbox};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default wall-clock limit for shell commands (5 minutes).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(300_000);

/// Context provided to tools during execution.
#[derive(Clone)]
pub struct ToolContext {
    /// Boundary for every file access.
    pub sandbox: PathSandbox,
    /// Denylist for shell commands.
    pub filter: CommandFilter,
    /// Operator approval for shell commands.
    pub confirmer: Arc<dyn Confirmer>,
    /// Wall-clock limit for a single command.
    pub command_timeout: Duration,
}

impl ToolContext {
    /// Create a context with the default command timeout.
    pub fn new(sandbox: PathSandbox, confirmer: Arc<dyn Confirmer>) -> Self {
        Self {
            sandbox,
            filter: CommandFilter::new(),
            confirmer,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Override the command timeout.
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// The project root directory.
    pub fn root_dir(&self) -> &Path {
        self.sandbox.project_root()
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("root_dir", &self.root_dir())
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

/// Result of a tool that ran to completion.
///
/// `success` is false when the tool ran but the operation itself did not
/// succeed, e.g. a command exiting non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub success: bool,
    pub data: Value,
}

impl ToolOutput {
    /// A successful output carrying `data`.
    pub fn new(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }

    /// Set the success flag.
    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }
}

/// Normalized outcome of one dispatched action, as reported to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(rename = "success")]
    pub ok: bool,
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    /// A failed action with an error message and no payload.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload: None,
            error: Some(error.into()),
        }
    }

    /// Pretty-printed JSON, as embedded in observation messages.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| {
            format!(
                "{{\"success\": {}, \"error\": {:?}}}",
                self.ok,
                self.error.as_deref().unwrap_or_default()
            )
        })
    }
}

impl From<ToolOutput> for ActionResult {
    fn from(output: ToolOutput) -> Self {
        Self {
            ok: output.success,
            payload: Some(output.data),
            error: None,
        }
    }
}

impl From<ToolError> for ActionResult {
    fn from(error: ToolError) -> Self {
        Self::failure(error.to_string())
    }
}

/// Description of a tool for the system prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub example: Value,
}

/// The main trait for tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool ID.
    fn id(&self) -> &str;

    /// Get the tool description (for the AI).
    fn description(&self) -> &str;

    /// Get the JSON Schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Example arguments shown to the model.
    fn example_args(&self) -> Value;

    /// Execute the tool.
    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput>;

    /// Prompt-facing description of this tool.
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.id().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
            example: self.example_args(),
        }
    }
}

/// A boxed tool for dynamic dispatch.
pub type BoxedTool = Arc<dyn Tool>;


#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use ollacode_sandbox::Confirmer;

    mockall::mock! {
        pub Gate {}

        #[async_trait]
        impl Confirmer for Gate {
            async fn confirm(&self, command: &str) -> bool;
        }
    }

    /// Context whose confirmer must never be asked.
    pub fn context(root: &Path) -> ToolContext {
        let mut gate = MockGate::new();
        gate.expect_confirm().never();
        context_with(root, gate)
    }

    pub fn context_with(root: &Path, gate: MockGate) -> ToolContext {
        let sandbox = PathSandbox::new(root).unwrap();
        ToolContext::new(sandbox, Arc::new(gate))
    }
}
