//! Logging setup using tracing.
//!
//! The conversation owns stdout, so logs go to a file by default and only
//! reach the terminal (stderr) when debugging.

use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a log level from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Human-readable records on stderr.
    Stderr,
    /// Append to the given file (no ANSI colors).
    File(PathBuf),
    /// Install the filter only; records are dropped.
    Off,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied to the ollacode crates.
    pub level: LogLevel,
    /// Destination for log records.
    pub target: LogTarget,
    /// Whether to include file/line info in logs.
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            target: LogTarget::Off,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Filter directives scoped to the workspace crates.
    pub fn directives(&self) -> String {
        let level = self.level.as_str();
        [
            "ollacode",
            "ollacode_core",
            "ollacode_provider",
            "ollacode_tools",
            "ollacode_sandbox",
            "ollacode_util",
        ]
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
    }
}

/// Initialize logging with the given configuration.
///
/// `RUST_LOG` overrides the configured directives. Calling this twice is a
/// no-op for the second call. Returns the log file path when logging to a file.
pub fn init(config: LogConfig) -> std::io::Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directives()));

    let registry = tracing_subscriber::registry().with(filter);

    match config.target {
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_file(config.include_location)
                .with_line_number(config.include_location);
            let _ = registry.with(layer).try_init();
            Ok(None)
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_file(config.include_location)
                .with_line_number(config.include_location);
            let _ = registry.with(layer).try_init();
            Ok(Some(path))
        }
        LogTarget::Off => {
            let _ = registry.try_init();
            Ok(None)
        }
    }
}

/// Get the default log file path.
pub fn default_log_path() -> PathBuf {
    crate::path::logs_dir().join("ollacode.log")
}
