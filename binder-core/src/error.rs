//! Error types for binder-core.

use std::path::PathBuf;

use thiserror::Error;

/// A token that could not be decoded strictly.
///
/// [`crate::codec::decode`] never surfaces this: it zero-fills instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A character outside `[A-Za-z0-9_-]` (after `+`/`/` normalisation).
    #[error("invalid token character {character:?} at position {position}")]
    InvalidCharacter { position: usize, character: char },

    /// The token length cannot come from whole bytes (`len % 4 == 1`).
    #[error("invalid token length {length}")]
    InvalidLength { length: usize },

    /// Any other base64 failure.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// All errors that can arise from checklist definition handling.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Underlying I/O failure, with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (write path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parse error on load, with the offending file.
    #[error("failed to parse checklist definition at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The definition file did not exist.
    #[error("checklist definition not found at {path}")]
    NotFound { path: PathBuf },

    /// Scaffolding refused to replace an existing file.
    #[error("{path} already exists; pass --force to overwrite")]
    AlreadyExists { path: PathBuf },

    /// A scaffold request that cannot produce a usable definition.
    #[error("invalid definition: {0}")]
    Invalid(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DefinitionError {
    DefinitionError::Io {
        path: path.into(),
        source,
    }
}
