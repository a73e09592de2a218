//! Per-checklist storage scoping.
//!
//! Several checklists can share one store (one origin, many set pages), so
//! every per-checklist key is suffixed with the checklist's set name.

use crate::error::StoreError;
use crate::fragment::PageAddress;
use crate::local_store::LocalStore;

/// Identity of a checklist page: where it is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistIdentity {
    pub host: String,
    pub path: String,
}

impl ChecklistIdentity {
    pub fn from_address(address: &PageAddress) -> Self {
        Self {
            host: address.host.clone(),
            path: address.path.clone(),
        }
    }

    /// Last path segment without `.html`: `/sets/alpha.html` → `alpha`.
    pub fn set_name(&self) -> &str {
        let last = self.path.rsplit('/').next().unwrap_or_default();
        last.strip_suffix(".html").unwrap_or(last)
    }

    /// `<prefix>_<set name>`.
    pub fn scoped_key(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.set_name())
    }

    /// Remote basket name unique to host + path:
    /// `example.com:8080/sets/alpha.html` → `example_com-8080_sets_alpha`.
    pub fn basket_name(&self) -> String {
        let full = format!("{}{}", self.host, self.path);
        full.strip_suffix(".html")
            .unwrap_or(&full)
            .replace('/', "_")
            .replace(':', "-")
            .replace('.', "_")
    }
}

/// Move a value from an unscoped `legacy` key to `scoped` once.
///
/// Does nothing when `scoped` already has a value or `legacy` is absent.
/// Returns whether a value was moved.
pub fn migrate_legacy_key(
    store: &impl LocalStore,
    legacy: &str,
    scoped: &str,
) -> Result<bool, StoreError> {
    if store.get(scoped)?.is_some() {
        return Ok(false);
    }
    let Some(value) = store.get(legacy)? else {
        return Ok(false);
    };
    store.set(scoped, &value)?;
    store.remove(legacy)?;
    tracing::info!("migrated legacy storage key '{legacy}' to '{scoped}'");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryStore;

    fn identity(raw: &str) -> ChecklistIdentity {
        ChecklistIdentity::from_address(&raw.parse().expect("address"))
    }

    #[test]
    fn set_name_strips_html() {
        assert_eq!(identity("https://example.com/sets/alpha.html").set_name(), "alpha");
        assert_eq!(identity("https://example.com/beta").set_name(), "beta");
    }

    #[test]
    fn scoped_keys_differ_per_set() {
        let a = identity("https://example.com/alpha.html");
        let b = identity("https://example.com/beta.html");
        assert_eq!(a.scoped_key("jsonstorage_blob_uri"), "jsonstorage_blob_uri_alpha");
        assert_ne!(a.scoped_key("x"), b.scoped_key("x"));
    }

    #[test]
    fn basket_name_substitutions() {
        assert_eq!(
            identity("https://example.com:8080/sets/alpha.html").basket_name(),
            "example_com-8080_sets_alpha"
        );
    }

    #[test]
    fn migration_moves_legacy_value_once() {
        let store = MemoryStore::with_entries([("jsonstorage_blob_uri", "https://blob/1")]);
        let moved = migrate_legacy_key(&store, "jsonstorage_blob_uri", "jsonstorage_blob_uri_alpha")
            .unwrap();
        assert!(moved);
        assert_eq!(
            store.get("jsonstorage_blob_uri_alpha").unwrap().as_deref(),
            Some("https://blob/1")
        );
        assert_eq!(store.get("jsonstorage_blob_uri").unwrap(), None);

        let again = migrate_legacy_key(&store, "jsonstorage_blob_uri", "jsonstorage_blob_uri_alpha")
            .unwrap();
        assert!(!again);
    }

    #[test]
    fn migration_keeps_existing_scoped_value() {
        let store = MemoryStore::with_entries([
            ("legacy", "old"),
            ("scoped", "new"),
        ]);
        assert!(!migrate_legacy_key(&store, "legacy", "scoped").unwrap());
        assert_eq!(store.get("scoped").unwrap().as_deref(), Some("new"));
        assert_eq!(store.get("legacy").unwrap().as_deref(), Some("old"));
    }
}
