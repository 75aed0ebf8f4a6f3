//! Scripted language model for agent tests.

use async_trait::async_trait;
use ollacode_provider::{LanguageModel, Message, ProviderError, ProviderResult, TextStream};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Stream these fragments, then end.
    Fragments(Vec<String>),
    /// Fail before streaming starts, as if the backend were down.
    ConnectionError(String),
    /// Stream some fragments, then fail mid-stream.
    StreamError {
        fragments: Vec<String>,
        message: String,
    },
}

/// A recorded call to the model.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub model: String,
}

/// A [`LanguageModel`] that replays queued responses and records every call.
///
/// When the queue is empty the default response is used; without one the
/// call fails so a runaway loop surfaces as an error.
///
/// ```rust
/// use ollacode_test_utils::providers::ScriptedModel;
///
/// let model = ScriptedModel::new()
///     .with_response("I'll read the file first.")
///     .with_fragments(["Do", "ne"]);
/// assert_eq!(model.call_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct ScriptedModel {
    responses: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    default_response: Arc<Mutex<Option<ScriptedResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply streamed as a single fragment.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(ScriptedResponse::Fragments(vec![text.into()]))
    }

    /// Queue a reply streamed as the given fragments.
    pub fn with_fragments<I, S>(self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(ScriptedResponse::Fragments(
            fragments.into_iter().map(Into::into).collect(),
        ))
    }

    /// Queue a connection failure.
    pub fn with_connection_error(self, message: impl Into<String>) -> Self {
        self.push(ScriptedResponse::ConnectionError(message.into()))
    }

    /// Queue a reply that fails after `fragments`.
    pub fn with_stream_error<I, S>(self, fragments: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(ScriptedResponse::StreamError {
            fragments: fragments.into_iter().map(Into::into).collect(),
            message: message.into(),
        })
    }

    /// Reply used once the queue is empty.
    pub fn with_default_response(self, text: impl Into<String>) -> Self {
        *self.default_response.lock().unwrap() =
            Some(ScriptedResponse::Fragments(vec![text.into()]));
        self
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn push(self, response: ScriptedResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    fn next_response(&self) -> Option<ScriptedResponse> {
        let queued = self.responses.lock().unwrap().pop_front();
        queued.or_else(|| self.default_response.lock().unwrap().clone())
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn stream_chat(&self, messages: &[Message], model: &str) -> ProviderResult<TextStream> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            model: model.to_string(),
        });

        match self.next_response() {
            Some(ScriptedResponse::Fragments(fragments)) => Ok(Box::pin(async_stream::stream! {
                for fragment in fragments {
                    yield Ok(fragment);
                }
            })),
            Some(ScriptedResponse::ConnectionError(message)) => {
                Err(ProviderError::connection("http://localhost:11434", message))
            }
            Some(ScriptedResponse::StreamError { fragments, message }) => {
                Ok(Box::pin(async_stream::stream! {
                    for fragment in fragments {
                        yield Ok(fragment);
                    }
                    yield Err(ProviderError::Stream(message));
                }))
            }
            None => Err(ProviderError::internal("no scripted response left")),
        }
    }

    fn provider_id(&self) -> &str {
        "scripted"
    }
}
