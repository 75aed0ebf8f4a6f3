//! Provider error types.

use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while talking to the model backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend could not be reached at all.
    #[error("Failed to connect to Ollama at {url}. Is Ollama running? Error: {message}")]
    Connection { url: String, message: String },

    /// HTTP transfer failed mid-request.
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Ollama API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// The backend reported an error inside the response stream.
    #[error("Ollama stream error: {0}")]
    Stream(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Internal provider error.
    #[error("Provider error: {message}")]
    Internal { message: String },
}

impl ProviderError {
    /// Create a connection error.
    pub fn connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an API error.
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the backend was unreachable (as opposed to answering badly).
    pub fn is_connection(&self) -> bool {
        match self {
            ProviderError::Connection { .. } => true,
            ProviderError::RequestFailed(e) => e.is_connect(),
            _ => false,
        }
    }
}
