//! Error types for the core crate.

use ollacode_provider::ProviderError;
use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The model backend could not be reached.
    #[error("Failed to connect to Ollama: {0}")]
    Connection(String),

    /// A tool failed in a way the model may recover from.
    #[error("Tool \"{tool}\" failed: {message}")]
    ToolExecution { tool: String, message: String },

    /// The agent could not continue.
    #[error("Agent error: {0}")]
    Agent(String),

    /// A security check refused an operation.
    #[error("Security error: {0}")]
    Security(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Model provider error.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a tool execution error.
    pub fn tool_execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create an agent error.
    pub fn agent(message: impl Into<String>) -> Self {
        Self::Agent(message.into())
    }

    /// Create a security error.
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security(message.into())
    }

    /// Whether the backend was unreachable.
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Provider(e) => e.is_connection(),
            _ => false,
        }
    }

    /// Whether the agent can keep going after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ToolExecution { .. })
    }

    /// Operator-facing text, with setup help for connection failures.
    pub fn troubleshooting(&self) -> String {
        if self.is_connection() {
            return "Failed to connect to Ollama.\n\n\
                    Troubleshooting steps:\n\
                    1. Make sure Ollama is installed: https://ollama.ai\n\
                    2. Start the Ollama service\n\
                    3. Verify it's running: curl http://localhost:11434/api/tags\n"
                .to_string();
        }
        self.to_string()
    }
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON/JSONC syntax.
    #[error("invalid config at {path}: {message}")]
    InvalidJson { path: String, message: String },

    /// A value is present but unusable.
    #[error("config validation failed: {message}")]
    Validation { message: String },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        assert_eq!(
            CoreError::tool_execution("read_file", "boom").to_string(),
            "Tool \"read_file\" failed: boom"
        );
        assert_eq!(CoreError::agent("stuck").to_string(), "Agent error: stuck");
        assert_eq!(
            CoreError::security("denied").to_string(),
            "Security error: denied"
        );
    }

    #[test]
    fn test_only_tool_errors_are_recoverable() {
        assert!(CoreError::tool_execution("x", "y").is_recoverable());
        assert!(!CoreError::security("no").is_recoverable());
        assert!(!CoreError::Connection("refused".into()).is_recoverable());
        assert!(!CoreError::agent("x").is_recoverable());
    }

    #[test]
    fn test_connection_troubleshooting() {
        let err: CoreError = ProviderError::connection("http://localhost:11434", "refused").into();
        let text = err.troubleshooting();
        assert!(text.starts_with("Failed to connect to Ollama.\n\nTroubleshooting steps:\n"));
        assert!(text.contains("1. Make sure Ollama is installed: https://ollama.ai\n"));
        assert!(text.ends_with("curl http://localhost:11434/api/tags\n"));

        let other = CoreError::agent("x");
        assert_eq!(other.troubleshooting(), "Agent error: x");
    }
}
