//! Shell command filtering.
//!
//! Matching is purely textual on the trimmed command. A denylist hit always
//! wins; anything not denied is allowed and left to operator confirmation.

use crate::decision::SecurityDecision;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

const DENY_PATTERNS: &[&str] = &[
    // Destructive deletes
    r"rm\s+(-rf|-fr|-r|-f)\s+/",
    r"rm\s+(-rf|-fr)\s+\*",
    r"rmdir\s+/\s+(-s|-r)",
    r"del\s+/[sS]\s+\*",
    r"rd\s+/[sS]\s+\\",
    // Disks and filesystems
    r"\bdd\s+if=",
    r"\bmkfs\.",
    r"\bfdisk\b",
    r"\bparted\b",
    // Privilege escalation
    r"\bsudo\s+rm",
    r"\bsudo\s+dd",
    r"\bsudo\s+.*>",
    // Permissions
    r"chmod\s+777",
    r"chmod\s+-R\s+777",
    // Power state
    r"\bshutdown\b",
    r"\breboot\b",
    r"\bhalt\b",
    r"\bpoweroff\b",
    // Fork bombs and endless loops
    r":\(\)\{.*:\|:.*\};:",
    r"\bwhile true.*do\b",
    // Raw device and system config writes
    r">\s*/dev/sd[a-z]",
    r">\s*/dev/hd[a-z]",
    r">\s*/etc/",
    // Package managers
    r"npm\s+install\s+-g.*sudo",
    r"pip\s+install.*--break-system-packages",
];

const SAFE_PATTERNS: &[&str] = &[
    r"^git\s+",
    r"^npm\s+(install|i|ci|run|test|build)",
    r"^yarn\s+(install|add|run|test|build)",
    r"^pnpm\s+(install|add|run|test|build)",
    r"^node\s+",
    r"^python\s+",
    r"^python3\s+",
    r"^ls\s+",
    r"^dir\s+",
    r"^cat\s+",
    r"^type\s+",
    r"^echo\s+",
    r"^mkdir\s+",
    r"^touch\s+",
    r"^grep\s+",
    r"^find\s+",
    r"^code\s+",
    r"^vim\s+",
    r"^nano\s+",
];

static DENY_LIST: Lazy<Vec<Regex>> = Lazy::new(|| compile(DENY_PATTERNS));
static SAFE_LIST: Lazy<Vec<Regex>> = Lazy::new(|| compile(SAFE_PATTERNS));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex pattern - this is a compile-time constant"))
        .collect()
}

/// Decides whether a shell command may run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandFilter;

impl CommandFilter {
    pub fn new() -> Self {
        Self
    }

    /// Full verdict for `command`.
    pub fn decide(&self, command: &str) -> SecurityDecision {
        match self.matching_deny_pattern(command) {
            Some(pattern) => {
                let reason = format!("Command matches dangerous pattern: {}", pattern);
                warn!(command = %command.trim(), pattern = %pattern, "Command blocked");
                SecurityDecision::deny(reason)
            }
            None => SecurityDecision::allow(),
        }
    }

    /// Whether `command` passes the denylist.
    pub fn is_allowed(&self, command: &str) -> bool {
        self.matching_deny_pattern(command).is_none()
    }

    /// Why `command` is denied, if it is.
    pub fn block_reason(&self, command: &str) -> Option<String> {
        self.matching_deny_pattern(command)
            .map(|pattern| format!("Command matches dangerous pattern: {}", pattern))
    }

    /// Whether `command` is on the allowlist and not denied.
    pub fn is_known_safe(&self, command: &str) -> bool {
        let trimmed = command.trim();
        SAFE_LIST.iter().any(|re| re.is_match(trimmed)) && self.is_allowed(trimmed)
    }

    fn matching_deny_pattern(&self, command: &str) -> Option<&'static str> {
        let trimmed = command.trim();
        DENY_LIST
            .iter()
            .find(|re| re.is_match(trimmed))
            .map(|re| re.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(DENY_LIST.len(), DENY_PATTERNS.len());
        assert_eq!(SAFE_LIST.len(), SAFE_PATTERNS.len());
    }

    #[test]
    fn test_destructive_commands_denied() {
        let filter = CommandFilter::new();
        for cmd in [
            "rm -rf /",
            "rm -rf *",
            "rm -r /home",
            "dd if=/dev/zero of=/dev/sda",
            "mkfs.ext4 /dev/sda1",
            "sudo rm file",
            "sudo echo x > /root/file",
            "chmod 777 secret",
            "shutdown -h now",
            "reboot",
            ":(){ :|:& };:",
            "while true; do echo; done",
            "echo bad > /etc/hosts",
            "cat image > /dev/sda",
            "pip install foo --break-system-packages",
        ] {
            assert!(!filter.is_allowed(cmd), "expected {cmd:?} to be denied");
        }
    }

    #[test]
    fn test_unknown_commands_allowed() {
        let filter = CommandFilter::new();
        assert!(filter.is_allowed("cargo build"));
        assert!(filter.is_allowed("make test"));
        assert!(!filter.is_known_safe("cargo build"));
    }

    #[test]
    fn test_deny_beats_allow() {
        let filter = CommandFilter::new();
        let cmd = "echo hi > /etc/passwd";
        assert!(!filter.is_allowed(cmd));
        assert!(!filter.is_known_safe(cmd));

        let decision = filter.decide("git status && rm -rf /");
        assert!(!decision.allowed);
    }

    #[test]
    fn test_known_safe() {
        let filter = CommandFilter::new();
        assert!(filter.is_known_safe("git status"));
        assert!(filter.is_known_safe("npm test"));
        assert!(filter.is_known_safe("  ls -la  "));
        assert!(!filter.is_known_safe("ls"));
    }

    #[test]
    fn test_block_reason() {
        let filter = CommandFilter::new();
        assert_eq!(
            filter.block_reason("rm -rf /"),
            Some(r"Command matches dangerous pattern: rm\s+(-rf|-fr|-r|-f)\s+/".to_string())
        );
        assert_eq!(filter.block_reason("ls -la"), None);
    }

    #[test]
    fn test_decide_carries_reason() {
        let filter = CommandFilter::new();
        let decision = filter.decide("  reboot  ");
        assert!(!decision.allowed);
        assert_eq!(
            decision.reason.as_deref(),
            Some(r"Command matches dangerous pattern: \breboot\b")
        );
        assert_eq!(filter.decide("echo hello"), SecurityDecision::allow());
    }

    #[test]
    fn test_package_install_is_allowed() {
        let filter = CommandFilter::new();
        assert!(filter.is_allowed("npm install express"));
        assert_eq!(filter.decide("npm install express"), SecurityDecision::allow());
        assert!(!filter.is_allowed("rm -rf /"));
    }
}
