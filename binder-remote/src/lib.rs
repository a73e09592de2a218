//! # binder-remote
//!
//! The remote side of state persistence: a key-addressed blob store reached
//! over HTTP. [`RemoteStore`] is the backend-agnostic contract (create,
//! fetch, replace, delete); [`JsonStorageBackend`] and [`PantryBackend`]
//! implement it, and [`Backend`] selects between them from configuration.

pub mod backend;
pub mod error;
pub mod http;
pub mod jsonstorage;
pub mod memory;
pub mod pantry;
pub mod store;
pub mod types;

pub use backend::{Backend, BackendKind, RemoteConfig};
pub use error::RemoteError;
pub use jsonstorage::JsonStorageBackend;
pub use memory::MemoryRemote;
pub use pantry::PantryBackend;
pub use store::RemoteStore;
pub use types::{Credentials, RemoteLocator, SyncRecord};
