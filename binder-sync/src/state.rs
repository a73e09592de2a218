//! Coordinator states and user-facing status lines.

use std::fmt;

/// Where the coordinator stands with respect to the remote record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No credentials.
    Unconfigured,
    ConfiguredClean,
    /// The current token differs from the last one confirmed remotely.
    ConfiguredDirty,
    Syncing,
    Loading,
}

/// A remote operation that occupies the coordinator while in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Sync,
    Load,
    Clear,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Sync => write!(f, "sync"),
            Operation::Load => write!(f, "load"),
            Operation::Clear => write!(f, "clear"),
        }
    }
}

/// Outcome line for the last explicit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
