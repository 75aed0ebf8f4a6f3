//! Logging initialization.
//!
//! The conversation owns stdout, so records go to a file in the platform log
//! directory unless `--debug` asks for them on stderr.

use ollacode_util::log::{default_log_path, LogConfig, LogLevel, LogTarget};
use std::path::PathBuf;

/// Initialize logging for a run.
/// Returns the log file path if logging to file.
pub fn init_logging(debug: bool) -> Option<PathBuf> {
    match ollacode_util::log::init(log_config(debug)) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Warning: Could not open log file: {e}");
            None
        }
    }
}

fn log_config(debug: bool) -> LogConfig {
    if debug {
        LogConfig {
            level: LogLevel::Debug,
            target: LogTarget::Stderr,
            include_location: true,
        }
    } else {
        LogConfig {
            level: LogLevel::Info,
            target: LogTarget::File(default_log_path()),
            include_location: false,
        }
    }
}
