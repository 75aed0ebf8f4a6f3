//! Scripted operator for the confirmation gate.

use async_trait::async_trait;
use ollacode_sandbox::Confirmer;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Answers confirmation prompts from a queue and records each prompt.
///
/// Once the queue runs out every further prompt gets the fallback answer
/// (decline unless set otherwise).
#[derive(Clone, Default)]
pub struct ScriptedConfirmer {
    answers: Arc<Mutex<VecDeque<bool>>>,
    fallback: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConfirmer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Approve everything.
    pub fn approving() -> Self {
        Self {
            fallback: true,
            ..Self::default()
        }
    }

    /// Decline everything.
    pub fn declining() -> Self {
        Self::default()
    }

    /// Queue an answer.
    pub fn with_answer(self, answer: bool) -> Self {
        self.answers.lock().unwrap().push_back(answer);
        self
    }

    /// Commands that were put to the operator.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, command: &str) -> bool {
        self.prompts.lock().unwrap().push(command.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback)
    }
}
