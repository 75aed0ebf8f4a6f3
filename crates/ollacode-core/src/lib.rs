//! Core of ollacode: the reason-act-observe loop.
//!
//! - [`parser`] pulls action requests out of free-form model output
//! - [`conversation`] holds the ordered message history of a run
//! - [`agent`] drives rounds until the model says it is done, the round
//!   budget runs out, or the model becomes unreachable
//! - [`config`] merges defaults, files, environment and CLI flags

pub mod agent;
pub mod config;
pub mod conversation;
pub mod error;
pub mod parser;
pub mod system_prompt;

pub use agent::{Agent, AgentObserver, AgentOutcome, LoopState, NoopObserver, RunState};
pub use config::{AgentSettings, Config};
pub use conversation::Conversation;
pub use error::{ConfigError, CoreError, CoreResult};
pub use parser::{done_message, has_done, parse_actions, ActionRequest};
