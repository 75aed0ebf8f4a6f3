//! Message history of a single run.

use ollacode_provider::Message;
use ollacode_tools::ActionResult;

/// Ordered, append-only message history.
///
/// Starts as `[system, task]`; nothing is ever removed or rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(task)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Record a dispatched action's result for the model to read.
    pub fn push_result(&mut self, tool: &str, result: &ActionResult) {
        self.push(Message::user(format!(
            "Tool \"{}\" result:\n{}",
            tool,
            result.to_pretty_json()
        )));
    }

    /// Record a dispatch that broke down before producing a result.
    pub fn push_error(&mut self, tool: &str, error: &str) {
        self.push(Message::user(format!("Tool \"{}\" error: {}", tool, error)));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
