//! Path utilities.
//!
//! Everything here is lexical: paths do not need to exist and symlinks are
//! not followed.

use std::path::{Component, Path, PathBuf};

/// Get the ollacode configuration directory.
///
/// - `$XDG_CONFIG_HOME/ollacode` if set
/// - `~/.config/ollacode` otherwise
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ollacode"))
}

/// Get the log directory path.
pub fn logs_dir() -> PathBuf {
    // macOS: ~/Library/Logs/ollacode
    // Linux: ~/.local/state/ollacode/logs
    // Windows: %LOCALAPPDATA%/ollacode/logs

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = dirs::home_dir() {
            return home.join("Library/Logs/ollacode");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(state_dir) = dirs::state_dir() {
            return state_dir.join("ollacode/logs");
        }
        if let Some(home) = dirs::home_dir() {
            return home.join(".local/state/ollacode/logs");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(local_app) = dirs::data_local_dir() {
            return local_app.join("ollacode/logs");
        }
    }

    PathBuf::from(".ollacode/logs")
}

/// Normalize a path by removing `.` and `..` components.
///
/// Unlike `canonicalize`, this doesn't require the path to exist. A `..` at
/// the filesystem root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            other => result.push(other),
        }
    }

    result
}

/// Split a path into its normal (named) segments.
///
/// Prefixes, root markers and `.` are dropped.
pub fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Whether `tail` equals the last `tail.len()` entries of `segments`.
pub fn ends_with_segments(segments: &[String], tail: &[&str]) -> bool {
    if tail.is_empty() || tail.len() > segments.len() {
        return false;
    }
    let offset = segments.len() - tail.len();
    segments[offset..]
        .iter()
        .zip(tail)
        .all(|(segment, expected)| segment == expected)
}
