//! In-process [`RemoteStore`] used by tests and offline runs.
//!
//! Clones share the same records, so a test can keep a handle to inspect
//! what a coordinator wrote.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use binder_core::Token;

use crate::error::RemoteError;
use crate::store::RemoteStore;
use crate::types::{Credentials, RemoteLocator};

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<RemoteLocator, Token>,
    created: usize,
    offline: bool,
    fail_status: Option<u16>,
    calls: Vec<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<Inner>>,
    basket: Option<String>,
}

impl MemoryRemote {
    /// Issues `memory://record/<n>` URIs on create.
    pub fn new() -> Self {
        Self::default()
    }

    /// Behaves like a fixed-basket backend: the locator is derived from the
    /// credentials and `basket`.
    pub fn with_basket(basket: impl Into<String>) -> Self {
        Self {
            basket: Some(basket.into()),
            ..Self::default()
        }
    }

    pub fn insert(&self, locator: RemoteLocator, token: Token) {
        self.lock().records.insert(locator, token);
    }

    pub fn get(&self, locator: &RemoteLocator) -> Option<Token> {
        self.lock().records.get(locator).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail every call with a network error while set.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Answer every call with this HTTP status while set.
    pub fn fail_with_status(&self, status: Option<u16>) {
        self.lock().fail_status = status;
    }

    /// Verbs invoked so far, oldest first.
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock only happens inside a failing test.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, verb: &'static str) -> Result<MutexGuard<'_, Inner>, Option<u16>> {
        let mut inner = self.lock();
        inner.calls.push(verb);
        if inner.offline {
            return Err(None);
        }
        if let Some(status) = inner.fail_status {
            return Err(Some(status));
        }
        Ok(inner)
    }
}

fn offline() -> RemoteError {
    RemoteError::Network("offline".to_string())
}

impl RemoteStore for MemoryRemote {
    fn fixed_locator(&self, credentials: &Credentials) -> Option<RemoteLocator> {
        self.basket.as_ref().map(|basket| RemoteLocator::Basket {
            account_id: credentials.expose().to_string(),
            basket: basket.clone(),
        })
    }

    async fn create_record(
        &self,
        credentials: &Credentials,
        token: &Token,
    ) -> Result<RemoteLocator, RemoteError> {
        let fixed = self.fixed_locator(credentials);
        let mut inner = self.begin("create").map_err(|status| match status {
            Some(status) => RemoteError::CreateFailed { status },
            None => offline(),
        })?;
        inner.created += 1;
        let locator = fixed.unwrap_or_else(|| RemoteLocator::Uri(format!("memory://record/{}", inner.created)));
        inner.records.insert(locator.clone(), token.clone());
        Ok(locator)
    }

    async fn fetch_record(&self, locator: &RemoteLocator) -> Result<Token, RemoteError> {
        let inner = self.begin("fetch").map_err(|status| match status {
            Some(status) => RemoteError::FetchFailed { status },
            None => offline(),
        })?;
        inner
            .records
            .get(locator)
            .cloned()
            .ok_or(RemoteError::FetchFailed { status: 404 })
    }

    async fn replace_record(
        &self,
        _credentials: &Credentials,
        locator: &RemoteLocator,
        token: &Token,
    ) -> Result<(), RemoteError> {
        let mut inner = self.begin("replace").map_err(|status| match status {
            Some(status) => RemoteError::ReplaceFailed { status },
            None => offline(),
        })?;
        inner.records.insert(locator.clone(), token.clone());
        Ok(())
    }

    async fn delete_record(
        &self,
        _credentials: &Credentials,
        locator: &RemoteLocator,
    ) -> Result<(), RemoteError> {
        let mut inner = self.begin("delete").map_err(|status| match status {
            Some(status) => RemoteError::DeleteFailed { status },
            None => offline(),
        })?;
        match inner.records.remove(locator) {
            Some(_) => Ok(()),
            None => Err(RemoteError::DeleteFailed { status: 404 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("k").expect("credentials")
    }

    #[tokio::test]
    async fn create_issues_distinct_uris() {
        let remote = MemoryRemote::new();
        let a = remote.create_record(&creds(), &Token::from("AA")).await.unwrap();
        let b = remote.create_record(&creds(), &Token::from("gA")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(remote.fetch_record(&b).await.unwrap(), Token::from("gA"));
        assert_eq!(remote.calls(), ["create", "create", "fetch"]);
    }

    #[tokio::test]
    async fn basket_mode_reuses_fixed_locator() {
        let remote = MemoryRemote::with_basket("site_alpha");
        let locator = remote.create_record(&creds(), &Token::from("AA")).await.unwrap();
        assert_eq!(Some(locator), remote.fixed_locator(&creds()));
    }

    #[tokio::test]
    async fn failure_switches() {
        let remote = MemoryRemote::new();
        remote.set_offline(true);
        let err = remote.create_record(&creds(), &Token::from("AA")).await.unwrap_err();
        assert_eq!(err.reason(), "network");

        remote.set_offline(false);
        remote.fail_with_status(Some(503));
        let locator = RemoteLocator::Uri("memory://record/1".to_string());
        let err = remote.fetch_record(&locator).await.unwrap_err();
        assert_eq!(err, RemoteError::FetchFailed { status: 503 });
    }
}
