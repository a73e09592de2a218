//! The Remote Channel contract.

use std::future::Future;

use binder_core::Token;

use crate::error::RemoteError;
use crate::types::{Credentials, RemoteLocator};

/// A key-addressed blob store holding one Sync Record per locator.
///
/// Records carry no version: concurrent writers from different clients
/// overwrite each other, last writer wins.
pub trait RemoteStore {
    /// The locator this backend always uses for `credentials`, if it is
    /// fixed rather than issued on create.
    fn fixed_locator(&self, _credentials: &Credentials) -> Option<RemoteLocator> {
        None
    }

    /// Create a record holding `token` and return where it lives.
    fn create_record(
        &self,
        credentials: &Credentials,
        token: &Token,
    ) -> impl Future<Output = Result<RemoteLocator, RemoteError>> + Send;

    /// Read the token stored at `locator`.
    fn fetch_record(
        &self,
        locator: &RemoteLocator,
    ) -> impl Future<Output = Result<Token, RemoteError>> + Send;

    /// Overwrite the record at `locator` with `token`. Idempotent.
    fn replace_record(
        &self,
        credentials: &Credentials,
        locator: &RemoteLocator,
        token: &Token,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Delete the record at `locator`.
    fn delete_record(
        &self,
        credentials: &Credentials,
        locator: &RemoteLocator,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
