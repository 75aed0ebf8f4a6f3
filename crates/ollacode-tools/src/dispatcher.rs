//! Routing of named actions to tools.

use crate::registry::ToolRegistry;
use crate::{ActionResult, ToolContext, ToolResult, ToolSpec};
use async_trait::async_trait;
use ollacode_util::TimingGuard;
use serde_json::Value;
use tracing::{debug, warn};

/// Executes named actions on behalf of the agent loop.
#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    /// Run the action `name` with `args`.
    ///
    /// Tool failures are reported inside the [`ActionResult`]; an `Err` means
    /// the dispatch itself broke down.
    async fn dispatch(&self, name: &str, args: Value) -> ToolResult<ActionResult>;

    /// Descriptions of the actions this dispatcher accepts.
    fn tools(&self) -> Vec<ToolSpec>;
}

/// Dispatcher backed by a [`ToolRegistry`].
pub struct ToolDispatcher {
    registry: ToolRegistry,
    ctx: ToolContext,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry, ctx: ToolContext) -> Self {
        Self { registry, ctx }
    }

    /// Dispatcher over the built-in tools.
    pub fn with_builtins(ctx: ToolContext) -> Self {
        Self::new(ToolRegistry::with_builtins(), ctx)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// Run `name`, folding every failure into the result.
    pub async fn run(&self, name: &str, args: Value) -> ActionResult {
        let Some(tool) = self.registry.get(name) else {
            warn!(tool = %name, "Unknown tool requested");
            return ActionResult::failure(format!(
                "Unknown tool: {}. Available tools: {}",
                name,
                self.registry.list().join(", ")
            ));
        };

        let _timing = TimingGuard::tool(name);
        match tool.execute(args, &self.ctx).await {
            Ok(output) => {
                debug!(tool = %name, success = output.success, "Tool completed");
                output.into()
            }
            Err(e) => {
                if e.is_security_denial() {
                    warn!(tool = %name, error = %e, "Tool call denied");
                } else {
                    debug!(tool = %name, error = %e, "Tool failed");
                }
                e.into()
            }
        }
    }
}

#[async_trait]
impl ActionDispatcher for ToolDispatcher {
    async fn dispatch(&self, name: &str, args: Value) -> ToolResult<ActionResult> {
        Ok(self.run(name, args).await)
    }

    fn tools(&self) -> Vec<ToolSpec> {
        self.registry.specs()
    }
}
