//! Error types for binder-store.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from local persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (storage file).
    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store cannot be used at all. Callers treat this as "nothing persisted".
    #[error("local storage unavailable: {0}")]
    Unavailable(String),

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// A page address that could not be parsed.
    #[error("invalid page address '{0}'")]
    InvalidAddress(String),
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
