//! Tool registry.

use crate::{BoxedTool, ToolSpec};
use std::sync::Arc;

/// Registry of available tools, kept in registration order.
pub struct ToolRegistry {
    tools: Vec<BoxedTool>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry with all built-in tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(Arc::new(crate::read::ReadFileTool));
        registry.register(Arc::new(crate::write::WriteFileTool));
        registry.register(Arc::new(crate::run::RunCommandTool));
        registry.register(Arc::new(crate::done::DoneTool));

        registry
    }

    /// Register a tool, replacing any tool with the same ID in place.
    pub fn register(&mut self, tool: BoxedTool) {
        match self.tools.iter_mut().find(|t| t.id() == tool.id()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by ID.
    pub fn get(&self, id: &str) -> Option<&BoxedTool> {
        self.tools.iter().find(|t| t.id() == id)
    }

    /// List all tool IDs.
    pub fn list(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.id()).collect()
    }

    /// Get all tools.
    pub fn all(&self) -> impl Iterator<Item = &BoxedTool> {
        self.tools.iter()
    }

    /// Prompt-facing descriptions of every tool.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
