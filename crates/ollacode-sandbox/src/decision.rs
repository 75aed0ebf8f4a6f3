//! Allow/deny verdicts.

/// Outcome of a security check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityDecision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl SecurityDecision {
    /// Permit the action.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// Refuse the action with a human-readable reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}
