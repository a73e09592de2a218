//! Locations of the on-disk store under the home directory.

use std::path::{Path, PathBuf};

use crate::error::StoreError;

pub const STORAGE_FILE: &str = "storage.json";

pub fn binder_root(home: &Path) -> PathBuf {
    home.join(".binder")
}

/// `<home>/.binder/storage.json`
pub fn storage_path(home: &Path) -> PathBuf {
    binder_root(home).join(STORAGE_FILE)
}

pub fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}
