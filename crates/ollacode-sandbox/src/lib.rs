//! Security gate for ollacode.
//!
//! Every side effect the agent asks for passes through here first:
//!
//! - [`CommandFilter`]: pattern-based allow/deny for shell commands
//! - [`PathSandbox`]: keeps file access inside the project root and away from
//!   credentials
//! - [`Confirmer`]: the operator's final yes/no before a command runs
//!
//! The gate decides independently of what the model intended; it only sees
//! the literal command or path.

pub mod command;
pub mod confirm;
pub mod decision;
pub mod error;
pub mod path;

pub use command::CommandFilter;
pub use confirm::{Confirmer, TerminalConfirmer};
pub use decision::SecurityDecision;
pub use error::{SandboxError, SandboxResult};
pub use path::PathSandbox;
