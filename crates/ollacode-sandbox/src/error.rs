//! Error types for sandbox checks.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a path is refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SandboxError {
    /// The path resolves outside the project root.
    #[error("Access denied: Path is outside project directory.\nProject root: {}\nAttempted path: {attempted}", root.display())]
    OutsideProject { root: PathBuf, attempted: String },

    /// The file name is on the credential denylist.
    #[error("Access denied: Cannot access sensitive file \"{0}\"")]
    SensitiveFile(String),

    /// The path ends in a protected directory.
    #[error("Access denied: Cannot access blocked directory \"{0}\"")]
    BlockedDirectory(String),
}

impl SandboxError {
    /// Create an outside-project error.
    pub fn outside_project(root: impl Into<PathBuf>, attempted: impl Into<String>) -> Self {
        Self::OutsideProject {
            root: root.into(),
            attempted: attempted.into(),
        }
    }
}

/// Result type for sandbox operations.
pub type SandboxResult<T> = Result<T, SandboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_project_message() {
        let err = SandboxError::outside_project("/work/app", "../etc/passwd");
        assert_eq!(
            err.to_string(),
            "Access denied: Path is outside project directory.\nProject root: /work/app\nAttempted path: ../etc/passwd"
        );
    }

    #[test]
    fn test_sensitive_file_message() {
        let err = SandboxError::SensitiveFile(".env".to_string());
        assert_eq!(
            err.to_string(),
            "Access denied: Cannot access sensitive file \".env\""
        );
    }
}
