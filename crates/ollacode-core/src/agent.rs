//! The agent loop.
//!
//! Each round sends the whole conversation to the model, records the reply,
//! parses action requests out of it and dispatches them. The loop ends when
//! the model calls `done`, when the round budget is spent, or when the model
//! cannot be reached.

use crate::config::AgentSettings;
use crate::conversation::Conversation;
use crate::parser::{done_message, has_done, parse_actions};
use crate::system_prompt;
use futures::StreamExt;
use ollacode_provider::{LanguageModel, Message, ProviderResult};
use ollacode_tools::{ActionDispatcher, ActionResult};
use ollacode_util::TimingGuard;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Message used when `done` carries no usable message.
pub const DEFAULT_DONE_MESSAGE: &str = "Task completed";

/// Error code reported when the round budget runs out.
pub const MAX_ITERATIONS_CODE: &str = "MAX_ITERATIONS";

/// Where the loop stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// The model called `done`.
    Done(String),
    /// The round budget was spent without `done`.
    Exhausted,
    /// The model could not produce a reply.
    Fatal(String),
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoopState::Running)
    }
}

/// Bookkeeping for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub iteration: u32,
    pub max_iterations: u32,
    pub state: LoopState,
}

impl RunState {
    pub fn new(max_iterations: u32) -> Self {
        Self {
            iteration: 0,
            max_iterations,
            state: LoopState::Running,
        }
    }

    /// Start the next round, or move to `Exhausted` if the budget is spent.
    pub fn advance(&mut self) -> bool {
        if self.iteration >= self.max_iterations {
            self.state = LoopState::Exhausted;
            return false;
        }
        self.iteration += 1;
        true
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Report for a finished run.
    pub fn outcome(&self) -> AgentOutcome {
        match &self.state {
            LoopState::Done(message) => AgentOutcome {
                success: true,
                message: message.clone(),
                iterations: self.iteration,
                error: None,
            },
            LoopState::Exhausted => AgentOutcome {
                success: false,
                message: "Maximum iterations reached without completion".to_string(),
                iterations: self.iteration,
                error: Some(MAX_ITERATIONS_CODE.to_string()),
            },
            LoopState::Fatal(cause) => AgentOutcome {
                success: false,
                message: format!("Agent failed: {}", cause),
                iterations: self.iteration,
                error: Some(cause.clone()),
            },
            LoopState::Running => AgentOutcome {
                success: false,
                message: "Agent stopped before finishing".to_string(),
                iterations: self.iteration,
                error: None,
            },
        }
    }
}

/// Final report of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentOutcome {
    pub success: bool,
    pub message: String,
    pub iterations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Hooks for watching a run. All methods default to doing nothing.
pub trait AgentObserver: Send {
    fn on_round_start(&mut self, _iteration: u32, _max_iterations: u32) {}

    fn on_token(&mut self, _token: &str) {}

    fn on_response_complete(&mut self, _response: &str) {}

    fn on_tool_call(&mut self, _name: &str, _args: &Value) {}

    fn on_tool_result(&mut self, _name: &str, _result: &ActionResult) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AgentObserver for NoopObserver {}

/// Drives a model through the reason-act-observe loop.
pub struct Agent {
    model: Arc<dyn LanguageModel>,
    dispatcher: Arc<dyn ActionDispatcher>,
    settings: AgentSettings,
    system_prompt: String,
    conversation: Option<Conversation>,
    iteration: u32,
}

impl Agent {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        dispatcher: Arc<dyn ActionDispatcher>,
        settings: AgentSettings,
    ) -> Self {
        let system_prompt = system_prompt::build(&dispatcher.tools());
        Self {
            model,
            dispatcher,
            settings,
            system_prompt,
            conversation: None,
            iteration: 0,
        }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Messages of the latest run.
    pub fn messages(&self) -> &[Message] {
        self.conversation
            .as_ref()
            .map(Conversation::messages)
            .unwrap_or_default()
    }

    /// Rounds started in the latest run.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Work on `task` until a terminal state is reached.
    pub async fn run(&mut self, task: &str, observer: &mut dyn AgentObserver) -> AgentOutcome {
        let mut conversation = Conversation::new(self.system_prompt.clone(), task);
        let mut run = RunState::new(self.settings.max_iterations);

        info!(
            model = %self.settings.model,
            max_iterations = self.settings.max_iterations,
            "Starting agent run"
        );

        while !run.is_terminal() {
            if !run.advance() {
                warn!(max_iterations = run.max_iterations, "Maximum iterations reached");
                break;
            }

            debug!(iteration = run.iteration, max = run.max_iterations, "Starting round");
            observer.on_round_start(run.iteration, run.max_iterations);

            run.state = self.round(&mut conversation, observer).await;
        }

        self.iteration = run.iteration;
        self.conversation = Some(conversation);

        let outcome = run.outcome();
        info!(
            success = outcome.success,
            iterations = outcome.iterations,
            "Agent run finished"
        );
        outcome
    }

    async fn round(
        &self,
        conversation: &mut Conversation,
        observer: &mut dyn AgentObserver,
    ) -> LoopState {
        let response = match self.fetch_response(conversation, observer).await {
            Ok(response) => response,
            Err(e) => {
                let cause = format!("Failed to get AI response: {}", e);
                error!(error = %e, "Model request failed");
                return LoopState::Fatal(cause);
            }
        };

        observer.on_response_complete(&response);
        conversation.push(Message::assistant(response.as_str()));

        let actions = parse_actions(&response);
        debug!(count = actions.len(), "Parsed actions");

        if has_done(&actions) {
            let message = done_message(&actions).unwrap_or_else(|| DEFAULT_DONE_MESSAGE.to_string());
            return LoopState::Done(message);
        }

        if actions.is_empty() {
            debug!("No actions in response, continuing");
        }

        for action in actions {
            let args = action.args_value();
            observer.on_tool_call(&action.name, &args);

            match self.dispatcher.dispatch(&action.name, args).await {
                Ok(result) => {
                    observer.on_tool_result(&action.name, &result);
                    conversation.push_result(&action.name, &result);
                }
                Err(e) => {
                    warn!(tool = %action.name, error = %e, "Dispatch failed");
                    conversation.push_error(&action.name, &e.to_string());
                }
            }
        }

        LoopState::Running
    }

    async fn fetch_response(
        &self,
        conversation: &Conversation,
        observer: &mut dyn AgentObserver,
    ) -> ProviderResult<String> {
        let _timing = TimingGuard::model(&self.settings.model);
        let mut stream = self
            .model
            .stream_chat(conversation.messages(), &self.settings.model)
            .await?;

        let mut response = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            observer.on_token(&fragment);
            response.push_str(&fragment);
        }

        Ok(response)
    }
}
