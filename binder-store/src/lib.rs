//! # binder-store
//!
//! The local side of state persistence: the shareable address fragment and a
//! scoped key-value store that survives restarts.
//!
//! [`LocalChannel`] bundles both behind the operations the sync coordinator
//! needs; [`FileStore`] and [`StoredAddress`] are the on-disk implementations,
//! [`MemoryStore`] and [`AddressBar`] the in-memory ones.

pub mod channel;
pub mod error;
pub mod fragment;
pub mod local_store;
pub mod paths;
pub mod scope;

pub use channel::LocalChannel;
pub use error::StoreError;
pub use fragment::{AddressBar, FragmentChannel, PageAddress, StoredAddress};
pub use local_store::{FileStore, LocalStore, MemoryStore};
pub use scope::ChecklistIdentity;
