//! # binder-sync
//!
//! The Sync Coordinator: reconciles the in-memory Flag Vector with the address
//! fragment, the local store and the remote Sync Record.
//!
//! Build a [`SyncCoordinator`] over any [`binder_store::LocalStore`],
//! [`binder_store::FragmentChannel`] and [`binder_remote::RemoteStore`], call
//! [`SyncCoordinator::startup`] once, then route every toggle through it.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod session;
pub mod state;

pub use config::{StorageKeys, SyncConfig};
pub use coordinator::{LoadTicket, StartupSource, SyncCoordinator, SyncTicket};
pub use error::SyncError;
pub use session::Session;
pub use state::{Operation, StatusMessage, SyncState};
