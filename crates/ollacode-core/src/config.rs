//! Configuration management for ollacode.
//!
//! Configuration is loaded from multiple sources and merged, later wins:
//! 1. Built-in defaults
//! 2. Global config: `<config_dir>/ollacode/config.json` (or `ollacode.json`,
//!    `ollacode.jsonc`)
//! 3. Environment variable: `OLLACODE_CONFIG_CONTENT`
//! 4. Project config: `ollacode.jsonc` or `ollacode.json` in the project directory
//! 5. Environment overrides: `OLLAMA_BASE_URL`, `OLLAMA_MODEL`,
//!    `MAX_ITERATIONS`, `DEBUG`
//! 6. Command-line flags (merged by the caller)
//!
//! Files may contain `//` and `/* */` comments.

use crate::error::{ConfigError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "qwen2.5-coder:7b";
pub const DEFAULT_MAX_ITERATIONS: u32 = 15;
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 300_000;

/// Main configuration structure. Unset fields fall back to defaults in
/// [`Config::resolved`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_ms: Option<u64>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub ollama_base_url: String,
    pub model: String,
    pub max_iterations: u32,
    pub debug: bool,
    pub command_timeout: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Config::default().resolved()
    }
}

impl Config {
    /// Load configuration from all file and environment sources.
    ///
    /// Returns the merged config and the files that contributed to it.
    pub async fn load(project_dir: Option<&Path>) -> CoreResult<(Self, Vec<PathBuf>)> {
        Self::load_with(project_dir, Self::global_config_dir().as_deref(), |key| {
            std::env::var(key).ok()
        })
        .await
    }

    /// [`Config::load`] with explicit global directory and environment.
    pub async fn load_with<F>(
        project_dir: Option<&Path>,
        global_dir: Option<&Path>,
        env: F,
    ) -> CoreResult<(Self, Vec<PathBuf>)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let mut sources = Vec::new();

        // 1. Global config
        if let Some(global_dir) = global_dir {
            for name in &["config.json", "ollacode.json", "ollacode.jsonc"] {
                let path = global_dir.join(name);
                if path.exists() {
                    let loaded = Self::load_file(&path).await?;
                    config = config.merge(loaded);
                    sources.push(path);
                    break;
                }
            }
        }

        // 2. Inline config from the environment
        if let Some(content) = env("OLLACODE_CONFIG_CONTENT") {
            let loaded = Self::parse_jsonc(&content, "<env>")?;
            config = config.merge(loaded);
        }

        // 3. Project config
        if let Some(dir) = project_dir {
            for name in &["ollacode.jsonc", "ollacode.json"] {
                let path = dir.join(name);
                if path.exists() {
                    let loaded = Self::load_file(&path).await?;
                    config = config.merge(loaded);
                    sources.push(path);
                    break;
                }
            }
        }

        // 4. Single-value environment overrides
        config = config.merge(Self::from_env(env));

        debug!(sources = ?sources, "Loaded configuration");
        Ok((config, sources))
    }

    /// Get the global config directory.
    pub fn global_config_dir() -> Option<PathBuf> {
        ollacode_util::path::config_dir()
    }

    /// Load configuration from a file.
    pub async fn load_file(path: &Path) -> CoreResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse_jsonc(&content, &path.display().to_string())
    }

    /// Overrides taken from individual environment variables.
    pub fn from_env<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.is_empty());

        let max_iterations = non_empty("MAX_ITERATIONS").and_then(|raw| {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    warn!(value = %raw, "Ignoring MAX_ITERATIONS: not a positive integer");
                    None
                }
            }
        });

        Self {
            ollama_base_url: non_empty("OLLAMA_BASE_URL"),
            model: non_empty("OLLAMA_MODEL"),
            max_iterations,
            debug: non_empty("DEBUG").filter(|v| v == "true").map(|_| true),
            command_timeout_ms: None,
        }
    }

    /// Parse JSONC (JSON with comments).
    pub fn parse_jsonc(content: &str, source: &str) -> CoreResult<Self> {
        let stripped = Self::strip_comments(content);

        serde_json::from_str(&stripped).map_err(|e| {
            ConfigError::InvalidJson {
                path: source.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Strip JSON comments.
    fn strip_comments(input: &str) -> String {
        let mut result = String::with_capacity(input.len());
        let mut chars = input.chars().peekable();
        let mut in_string = false;
        let mut escape_next = false;

        while let Some(c) = chars.next() {
            if escape_next {
                result.push(c);
                escape_next = false;
                continue;
            }

            if c == '\\' && in_string {
                result.push(c);
                escape_next = true;
                continue;
            }

            if c == '"' {
                in_string = !in_string;
                result.push(c);
                continue;
            }

            if in_string {
                result.push(c);
                continue;
            }

            if c == '/' {
                match chars.peek() {
                    Some('/') => {
                        chars.next();
                        for c in chars.by_ref() {
                            if c == '\n' {
                                result.push('\n');
                                break;
                            }
                        }
                        continue;
                    }
                    Some('*') => {
                        chars.next();
                        let mut prev = ' ';
                        for c in chars.by_ref() {
                            if prev == '*' && c == '/' {
                                break;
                            }
                            // Keep line numbers stable for parse errors
                            if c == '\n' {
                                result.push('\n');
                            }
                            prev = c;
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            result.push(c);
        }

        result
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(self, other: Self) -> Self {
        Self {
            ollama_base_url: merge_option(self.ollama_base_url, other.ollama_base_url),
            model: merge_option(self.model, other.model),
            max_iterations: merge_option(self.max_iterations, other.max_iterations),
            debug: merge_option(self.debug, other.debug),
            command_timeout_ms: merge_option(self.command_timeout_ms, other.command_timeout_ms),
        }
    }

    /// Fill in defaults.
    pub fn resolved(&self) -> AgentSettings {
        AgentSettings {
            ollama_base_url: self
                .ollama_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
            model: self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            debug: self.debug.unwrap_or(false),
            command_timeout: Duration::from_millis(
                self.command_timeout_ms.unwrap_or(DEFAULT_COMMAND_TIMEOUT_MS),
            ),
        }
    }
}

/// Merge two Option values.
fn merge_option<T>(base: Option<T>, other: Option<T>) -> Option<T> {
    match (base, other) {
        (_, Some(o)) => Some(o),
        (b, None) => b,
    }
}
