//! JSONStorage backend: one record per URI, issued on create.
//!
//! | verb    | request                              |
//! |---------|--------------------------------------|
//! | create  | `POST {base}?apiKey=K` → `{"uri"}`   |
//! | fetch   | `GET {uri}`                          |
//! | replace | `PUT {uri}?apiKey=K`                 |
//! | delete  | `DELETE {uri}?apiKey=K`              |

use binder_core::Token;
use serde::Deserialize;

use crate::error::RemoteError;
use crate::http::{with_api_key, HttpClient};
use crate::store::RemoteStore;
use crate::types::{Credentials, RemoteLocator, SyncRecord};

pub const DEFAULT_BASE_URL: &str = "https://api.jsonstorage.net/v1/json";

#[derive(Debug, Deserialize)]
struct Created {
    uri: String,
}

#[derive(Debug, Clone)]
pub struct JsonStorageBackend {
    base_url: String,
    http: HttpClient,
}

impl JsonStorageBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: HttpClient::new(),
        }
    }
}

impl Default for JsonStorageBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn record_uri(locator: &RemoteLocator) -> Result<&str, RemoteError> {
    match locator {
        RemoteLocator::Uri(uri) => Ok(uri),
        RemoteLocator::Basket { .. } => Err(RemoteError::NotConfigured(format!(
            "jsonstorage cannot address '{locator}'"
        ))),
    }
}

impl RemoteStore for JsonStorageBackend {
    async fn create_record(
        &self,
        credentials: &Credentials,
        token: &Token,
    ) -> Result<RemoteLocator, RemoteError> {
        let url = with_api_key(&self.base_url, credentials.expose());
        let body = SyncRecord { state: token.clone() };
        let reply = self.http.send("POST", url, Some(body)).await?;
        if !reply.is_success() {
            return Err(RemoteError::CreateFailed {
                status: reply.status,
            });
        }
        let created: Created = reply.json()?;
        tracing::info!("created remote record {}", created.uri);
        Ok(RemoteLocator::Uri(created.uri))
    }

    async fn fetch_record(&self, locator: &RemoteLocator) -> Result<Token, RemoteError> {
        let url = record_uri(locator)?.to_string();
        let reply = self.http.send::<()>("GET", url, None).await?;
        if !reply.is_success() {
            return Err(RemoteError::FetchFailed {
                status: reply.status,
            });
        }
        Ok(reply.json::<SyncRecord>()?.state)
    }

    async fn replace_record(
        &self,
        credentials: &Credentials,
        locator: &RemoteLocator,
        token: &Token,
    ) -> Result<(), RemoteError> {
        let url = with_api_key(record_uri(locator)?, credentials.expose());
        let body = SyncRecord { state: token.clone() };
        let reply = self.http.send("PUT", url, Some(body)).await?;
        if !reply.is_success() {
            return Err(RemoteError::ReplaceFailed {
                status: reply.status,
            });
        }
        Ok(())
    }

    async fn delete_record(
        &self,
        credentials: &Credentials,
        locator: &RemoteLocator,
    ) -> Result<(), RemoteError> {
        let url = with_api_key(record_uri(locator)?, credentials.expose());
        let reply = self.http.send::<()>("DELETE", url, None).await?;
        if !reply.is_success() {
            return Err(RemoteError::DeleteFailed {
                status: reply.status,
            });
        }
        Ok(())
    }
}
