//! Shared utilities for ollacode.
//!
//! - Logging setup with tracing
//! - Lexical path handling for sandbox checks
//! - RAII timing of tool dispatch and model requests

pub mod log;
pub mod path;
pub mod timing;

pub use log::{LogConfig, LogLevel, LogTarget};
pub use timing::TimingGuard;
