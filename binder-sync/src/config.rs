//! The coordinator's explicit configuration and the store keys it lives under.

use binder_core::Token;
use binder_remote::{BackendKind, Credentials, RemoteLocator};
use binder_store::ChecklistIdentity;

/// Credentials, locator and the last token confirmed remotely.
///
/// Owned by the coordinator; nothing reads these from ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
    pub credentials: Option<Credentials>,
    pub locator: Option<RemoteLocator>,
    pub last_synced_token: Option<Token>,
}

impl SyncConfig {
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

/// Local store keys for one checklist on one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Shared by every checklist on the same origin.
    pub credentials: String,
    pub locator: String,
    /// Unscoped locator key written by older pages, migrated once.
    pub legacy_locator: Option<String>,
    pub address: String,
    pub session: String,
}

impl StorageKeys {
    pub fn new(backend: BackendKind, identity: &ChecklistIdentity) -> Self {
        let (credentials, locator_prefix, legacy_locator) = match backend {
            BackendKind::JsonStorage => (
                "jsonstorage_api_key",
                "jsonstorage_blob_uri",
                Some("jsonstorage_blob_uri".to_string()),
            ),
            BackendKind::Pantry => ("pantry_id", "pantry_basket", None),
        };
        Self {
            credentials: credentials.to_string(),
            locator: identity.scoped_key(locator_prefix),
            legacy_locator,
            address: identity.scoped_key("page_address"),
            session: identity.scoped_key("session"),
        }
    }
}
