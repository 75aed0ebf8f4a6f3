//! Command handlers for the ollacode CLI.

pub mod logging;
pub mod run;

pub use logging::*;
pub use run::*;
