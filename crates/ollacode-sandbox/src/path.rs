//! Filesystem boundary for tool access.

use crate::decision::SecurityDecision;
use crate::error::{SandboxError, SandboxResult};
use ollacode_util::path::{ends_with_segments, normalize, segments};
use std::path::{Path, PathBuf};
use tracing::warn;

/// File names that commonly hold credentials.
const SENSITIVE_FILES: &[&str] = &[
    ".env",
    ".env.local",
    ".env.development",
    ".env.production",
    ".env.test",
    "credentials.json",
    "secrets.json",
    "id_rsa",
    "id_dsa",
    "id_ecdsa",
    "id_ed25519",
    ".npmrc",
    ".pypirc",
];

/// Directories matched against the tail of a path.
const BLOCKED_DIRECTORIES: &[&str] = &[".git/config", ".ssh", "node_modules/.bin"];

/// Confines file access to a project root.
///
/// Resolution is lexical: `.` and `..` are folded without touching the
/// filesystem, so the checks hold for files that do not exist yet.
#[derive(Debug, Clone)]
pub struct PathSandbox {
    root: PathBuf,
}

impl PathSandbox {
    /// Create a sandbox rooted at `root`. Relative roots are taken from the
    /// current directory.
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(root)
        };
        Ok(Self {
            root: normalize(&root),
        })
    }

    /// The project root.
    pub fn project_root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` against the root and check it against the boundary and
    /// denylists. Returns the normalized absolute path.
    pub fn resolve(&self, path: impl AsRef<Path>) -> SandboxResult<PathBuf> {
        let raw = path.as_ref();
        let joined = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            self.root.join(raw)
        };
        let resolved = normalize(&joined);

        if !resolved.starts_with(&self.root) {
            warn!(path = %raw.display(), root = %self.root.display(), "Path escapes project root");
            return Err(SandboxError::outside_project(
                &self.root,
                raw.to_string_lossy(),
            ));
        }

        if let Some(name) = resolved.file_name().and_then(|n| n.to_str()) {
            if SENSITIVE_FILES.contains(&name) {
                warn!(path = %resolved.display(), "Blocked access to sensitive file");
                return Err(SandboxError::SensitiveFile(name.to_string()));
            }
        }

        let parts = segments(&resolved);
        for blocked in BLOCKED_DIRECTORIES {
            let tail: Vec<&str> = blocked.split('/').collect();
            if ends_with_segments(&parts, &tail) {
                warn!(path = %resolved.display(), blocked = %blocked, "Blocked access to protected directory");
                return Err(SandboxError::BlockedDirectory((*blocked).to_string()));
            }
        }

        Ok(resolved)
    }

    /// Whether `path` would resolve successfully.
    pub fn is_safe(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).is_ok()
    }

    /// Verdict form of [`PathSandbox::resolve`].
    pub fn decide(&self, path: impl AsRef<Path>) -> SecurityDecision {
        match self.resolve(path) {
            Ok(_) => SecurityDecision::allow(),
            Err(e) => SecurityDecision::deny(e.to_string()),
        }
    }
}
