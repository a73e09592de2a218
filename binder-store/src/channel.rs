//! The Local Channel: fragment plus scoped records, behind one handle.

use binder_core::Token;

use crate::error::StoreError;
use crate::fragment::{FragmentChannel, PageAddress};
use crate::local_store::LocalStore;
use crate::scope::migrate_legacy_key;

#[derive(Debug, Clone)]
pub struct LocalChannel<S, F> {
    store: S,
    fragment: F,
}

impl<S: LocalStore, F: FragmentChannel> LocalChannel<S, F> {
    pub fn new(store: S, fragment: F) -> Self {
        Self { store, fragment }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn address(&self) -> Result<PageAddress, StoreError> {
        self.fragment.address()
    }

    pub fn read_fragment(&self) -> Result<Option<Token>, StoreError> {
        self.fragment.read_fragment()
    }

    pub fn write_fragment(&mut self, token: &Token) -> Result<(), StoreError> {
        self.fragment.write_fragment(token)
    }

    /// Go to a new address, e.g. when the user pastes a shared link.
    pub fn navigate(&mut self, address: PageAddress) -> Result<(), StoreError> {
        self.fragment.navigate(address)
    }

    pub fn read_local_record(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.store.get(key)
    }

    pub fn write_local_record(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.store.set(key, value)
    }

    pub fn delete_local_record(&self, key: &str) -> Result<(), StoreError> {
        self.store.remove(key)
    }

    /// See [`migrate_legacy_key`].
    pub fn migrate_legacy(&self, legacy: &str, scoped: &str) -> Result<bool, StoreError> {
        migrate_legacy_key(&self.store, legacy, scoped)
    }
}
