//! Model access for ollacode.
//!
//! The agent only ever sees a [`LanguageModel`]: hand it the conversation and
//! a model name, get back an asynchronous sequence of text fragments. The
//! [`ollama::OllamaClient`] is the production implementation.

pub mod error;
pub mod message;
pub mod ollama;
pub mod stream;

pub use error::{ProviderError, ProviderResult};
pub use message::{Message, Role};
pub use ollama::OllamaClient;
pub use stream::TextStream;

use async_trait::async_trait;

/// A chat model that streams its reply as text fragments.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Start a streamed completion for `messages` using `model`.
    ///
    /// Errors returned here (rather than inside the stream) mean the request
    /// never got going, e.g. the backend is unreachable.
    async fn stream_chat(&self, messages: &[Message], model: &str) -> ProviderResult<TextStream>;

    /// Get the provider ID (e.g., "ollama").
    fn provider_id(&self) -> &str;
}
