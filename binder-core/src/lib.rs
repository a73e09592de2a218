//! Binder core library — flag vectors, the token codec, checklist definitions.
//!
//! Public API surface:
//! - [`flags`] — [`FlagVector`] and [`Token`]
//! - [`codec`] — bit packing + URL-safe base64
//! - [`checklist`] — definition model, item enumeration, load / save
//! - [`progress`] — per-category completion counts
//! - [`clear`] — the clear / undo toggle
//! - [`scaffold`] — building new, empty definitions
//! - [`error`] — [`CodecError`], [`DefinitionError`]

pub mod checklist;
pub mod clear;
pub mod codec;
pub mod error;
pub mod flags;
pub mod progress;
pub mod scaffold;

pub use checklist::{Category, ChecklistDefinition, ItemRef};
pub use clear::{ClearAction, ClearToggle};
pub use codec::{decode, encode, try_decode};
pub use error::{CodecError, DefinitionError};
pub use flags::{FlagVector, Token};
pub use progress::{Progress, ProgressReport};
