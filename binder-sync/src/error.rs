//! Error types for binder-sync.

use thiserror::Error;

use binder_remote::RemoteError;
use binder_store::StoreError;

use crate::state::Operation;

/// All errors that can arise from coordinator operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A remote operation failed; local state is unchanged.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The local store or the address could not be written.
    #[error("local storage error: {0}")]
    Store(#[from] StoreError),

    /// Session snapshot (de)serialization.
    #[error("session JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Another remote operation is still in flight.
    #[error("a {0} is already in progress")]
    Busy(Operation),

    #[error("credentials must not be blank")]
    InvalidCredentials,

    #[error("item index {index} is out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("expected {expected} flags, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl SyncError {
    /// The remote failure behind this error, if any.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            SyncError::Remote(e) => Some(e),
            _ => None,
        }
    }
}
