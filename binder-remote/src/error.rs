//! Error types for binder-remote.

use thiserror::Error;

/// A failed remote operation. Never fatal: the coordinator turns it into a
/// status message and leaves local state as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("create failed: HTTP {status}")]
    CreateFailed { status: u16 },

    #[error("replace failed: HTTP {status}")]
    ReplaceFailed { status: u16 },

    #[error("fetch failed: HTTP {status}")]
    FetchFailed { status: u16 },

    /// A success response whose body is not `{"state": "<token>"}` (or, for
    /// create, lacks the new record's locator).
    #[error("fetch failed: malformed payload ({0})")]
    MalformedPayload(String),

    #[error("delete failed: HTTP {status}")]
    DeleteFailed { status: u16 },

    /// Timeout, DNS, refused connection, offline.
    #[error("network error: {0}")]
    Network(String),

    /// No credentials, or a locator the active backend cannot address.
    #[error("remote sync is not configured: {0}")]
    NotConfigured(String),
}

impl RemoteError {
    /// Stable kebab-case reason string.
    pub fn reason(&self) -> &'static str {
        match self {
            RemoteError::CreateFailed { .. } | RemoteError::ReplaceFailed { .. } => "create-failed",
            RemoteError::FetchFailed { .. } | RemoteError::MalformedPayload(_) => "fetch-failed",
            RemoteError::DeleteFailed { .. } => "delete-failed",
            RemoteError::Network(_) => "network",
            RemoteError::NotConfigured(_) => "not-configured",
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::CreateFailed { status }
            | RemoteError::ReplaceFailed { status }
            | RemoteError::FetchFailed { status }
            | RemoteError::DeleteFailed { status } => Some(*status),
            RemoteError::MalformedPayload(_)
            | RemoteError::Network(_)
            | RemoteError::NotConfigured(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_and_statuses() {
        let err = RemoteError::ReplaceFailed { status: 503 };
        assert_eq!(err.reason(), "create-failed");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "replace failed: HTTP 503");

        let err = RemoteError::MalformedPayload("missing field `state`".to_string());
        assert_eq!(err.reason(), "fetch-failed");
        assert_eq!(err.status(), None);

        assert_eq!(RemoteError::Network("offline".to_string()).reason(), "network");
    }
}
