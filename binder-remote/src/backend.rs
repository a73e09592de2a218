//! Backend selection from configuration.

use std::fmt;
use std::str::FromStr;

use binder_core::Token;

use crate::error::RemoteError;
use crate::jsonstorage::{self, JsonStorageBackend};
use crate::pantry::{self, PantryBackend};
use crate::store::RemoteStore;
use crate::types::{Credentials, RemoteLocator};

/// Which remote service holds Sync Records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    JsonStorage,
    Pantry,
}

impl BackendKind {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            BackendKind::JsonStorage => jsonstorage::DEFAULT_BASE_URL,
            BackendKind::Pantry => pantry::DEFAULT_BASE_URL,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::JsonStorage => write!(f, "jsonstorage"),
            BackendKind::Pantry => write!(f, "pantry"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jsonstorage" => Ok(BackendKind::JsonStorage),
            "pantry" => Ok(BackendKind::Pantry),
            other => Err(format!(
                "unknown backend '{other}'; expected: jsonstorage, pantry"
            )),
        }
    }
}

/// Backend choice plus an optional base URL override.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteConfig {
    pub backend: BackendKind,
    pub base_url: Option<String>,
}

impl RemoteConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.backend.default_base_url())
    }

    /// Build the backend; `basket` is only used by fixed-basket services.
    pub fn build(&self, basket: &str) -> Backend {
        match self.backend {
            BackendKind::JsonStorage => Backend::JsonStorage(JsonStorageBackend::new(self.base_url())),
            BackendKind::Pantry => Backend::Pantry(PantryBackend::new(self.base_url(), basket)),
        }
    }
}

/// The configured backend.
#[derive(Debug, Clone)]
pub enum Backend {
    JsonStorage(JsonStorageBackend),
    Pantry(PantryBackend),
}

impl RemoteStore for Backend {
    fn fixed_locator(&self, credentials: &Credentials) -> Option<RemoteLocator> {
        match self {
            Backend::JsonStorage(b) => b.fixed_locator(credentials),
            Backend::Pantry(b) => b.fixed_locator(credentials),
        }
    }

    async fn create_record(
        &self,
        credentials: &Credentials,
        token: &Token,
    ) -> Result<RemoteLocator, RemoteError> {
        match self {
            Backend::JsonStorage(b) => b.create_record(credentials, token).await,
            Backend::Pantry(b) => b.create_record(credentials, token).await,
        }
    }

    async fn fetch_record(&self, locator: &RemoteLocator) -> Result<Token, RemoteError> {
        match self {
            Backend::JsonStorage(b) => b.fetch_record(locator).await,
            Backend::Pantry(b) => b.fetch_record(locator).await,
        }
    }

    async fn replace_record(
        &self,
        credentials: &Credentials,
        locator: &RemoteLocator,
        token: &Token,
    ) -> Result<(), RemoteError> {
        match self {
            Backend::JsonStorage(b) => b.replace_record(credentials, locator, token).await,
            Backend::Pantry(b) => b.replace_record(credentials, locator, token).await,
        }
    }

    async fn delete_record(
        &self,
        credentials: &Credentials,
        locator: &RemoteLocator,
    ) -> Result<(), RemoteError> {
        match self {
            Backend::JsonStorage(b) => b.delete_record(credentials, locator).await,
            Backend::Pantry(b) => b.delete_record(credentials, locator).await,
        }
    }
}
