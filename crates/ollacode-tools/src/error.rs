//! Tool error types.
//!
//! Display strings are what the model reads back in the observation message,
//! so they stay short and literal.

use ollacode_sandbox::SandboxError;
use thiserror::Error;

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur during tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Invalid or missing arguments.
    #[error("{0}")]
    Validation(String),

    /// The file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The OS refused access.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The command filter refused the command.
    #[error("Command blocked for security reasons: {0}")]
    Blocked(String),

    /// The operator declined the command.
    #[error("Command execution cancelled by user")]
    Cancelled,

    /// The command exceeded its wall-clock limit.
    #[error("Command execution timed out")]
    Timeout(std::time::Duration),

    /// Execution failed.
    #[error("{0}")]
    ExecutionFailed(String),

    /// The path sandbox refused the path.
    #[error("{0}")]
    Sandbox(#[from] SandboxError),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a permission denied error.
    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied(path.into())
    }

    /// Create an execution failed error.
    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed(message.into())
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound(path.into())
    }

    /// Whether a security check (not the tool itself) stopped the call.
    pub fn is_security_denial(&self) -> bool {
        matches!(self, Self::Blocked(_) | Self::Cancelled | Self::Sandbox(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_messages() {
        assert_eq!(
            ToolError::Blocked("rm -rf /".into()).to_string(),
            "Command blocked for security reasons: rm -rf /"
        );
        assert_eq!(
            ToolError::Cancelled.to_string(),
            "Command execution cancelled by user"
        );
        assert_eq!(
            ToolError::Timeout(Duration::from_secs(300)).to_string(),
            "Command execution timed out"
        );
        assert_eq!(
            ToolError::file_not_found("missing.txt").to_string(),
            "File not found: missing.txt"
        );
        assert_eq!(
            ToolError::validation("Missing or invalid \"path\" argument").to_string(),
            "Missing or invalid \"path\" argument"
        );
    }

    #[test]
    fn test_sandbox_error_passes_through() {
        let err: ToolError = SandboxError::SensitiveFile(".npmrc".into()).into();
        assert_eq!(
            err.to_string(),
            "Access denied: Cannot access sensitive file \".npmrc\""
        );
        assert!(err.is_security_denial());
        assert!(!ToolError::file_not_found("x").is_security_denial());
    }
}
