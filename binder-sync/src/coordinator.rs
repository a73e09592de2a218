//! The Sync Coordinator state machine.
//!
//! Every flag mutation rewrites the fragment synchronously. Remote operations
//! are awaited one at a time; a second one started while the first is still
//! in flight fails with [`SyncError::Busy`].

use tracing::{debug, info, warn};

use binder_core::{codec, ClearAction, ClearToggle, FlagVector, Token};
use binder_remote::{Credentials, RemoteError, RemoteLocator, RemoteStore};
use binder_store::{FragmentChannel, LocalChannel, LocalStore, PageAddress};

use crate::config::{StorageKeys, SyncConfig};
use crate::error::SyncError;
use crate::session::Session;
use crate::state::{Operation, StatusMessage, SyncState};

/// Where [`SyncCoordinator::startup`] took the initial flags from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupSource {
    Remote,
    Fragment,
    /// Neither source had a token; every flag is false.
    Empty,
}

/// An explicit sync that has been started but not finished.
#[derive(Debug)]
pub struct SyncTicket {
    credentials: Credentials,
    locator: Option<RemoteLocator>,
    token: Token,
}

impl SyncTicket {
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Create the record when there is no locator yet, otherwise replace it.
    /// Returns the new locator when one was created.
    pub async fn execute<R: RemoteStore>(
        &self,
        remote: &R,
    ) -> Result<Option<RemoteLocator>, RemoteError> {
        match &self.locator {
            Some(locator) => remote
                .replace_record(&self.credentials, locator, &self.token)
                .await
                .map(|()| None),
            None => remote
                .create_record(&self.credentials, &self.token)
                .await
                .map(Some),
        }
    }
}

/// An explicit load that has been started but not finished.
#[derive(Debug)]
pub struct LoadTicket {
    locator: RemoteLocator,
}

impl LoadTicket {
    pub fn locator(&self) -> &RemoteLocator {
        &self.locator
    }

    pub async fn execute<R: RemoteStore>(&self, remote: &R) -> Result<Token, RemoteError> {
        remote.fetch_record(&self.locator).await
    }
}

pub struct SyncCoordinator<S, F, R> {
    flags: FlagVector,
    config: SyncConfig,
    keys: StorageKeys,
    local: LocalChannel<S, F>,
    remote: R,
    busy: Option<Operation>,
    clear: ClearToggle,
    status: Option<StatusMessage>,
}

impl<S: LocalStore, F: FragmentChannel, R: RemoteStore> SyncCoordinator<S, F, R> {
    /// A coordinator for a checklist of `len` items, all unchecked and
    /// unconfigured until [`startup`](Self::startup) or
    /// [`resume`](Self::resume) runs.
    pub fn new(len: usize, local: LocalChannel<S, F>, remote: R, keys: StorageKeys) -> Self {
        Self {
            flags: FlagVector::new(len),
            config: SyncConfig::default(),
            keys,
            local,
            remote,
            busy: None,
            clear: ClearToggle::default(),
            status: None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn flags(&self) -> &FlagVector {
        &self.flags
    }

    pub fn token(&self) -> Token {
        codec::encode(&self.flags)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn local(&self) -> &LocalChannel<S, F> {
        &self.local
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Outcome of the last explicit remote operation.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn clear_toggle(&self) -> &ClearToggle {
        &self.clear
    }

    pub fn address(&self) -> Result<PageAddress, SyncError> {
        Ok(self.local.address()?)
    }

    /// True when the current token differs from the last one confirmed
    /// remotely. Never true before a first sync or load.
    pub fn is_dirty(&self) -> bool {
        self.config
            .last_synced_token
            .as_ref()
            .is_some_and(|synced| *synced != self.token())
    }

    pub fn state(&self) -> SyncState {
        match self.busy {
            Some(Operation::Sync) => SyncState::Syncing,
            Some(Operation::Load) | Some(Operation::Clear) => SyncState::Loading,
            None if !self.config.is_configured() => SyncState::Unconfigured,
            None if self.is_dirty() => SyncState::ConfiguredDirty,
            None => SyncState::ConfiguredClean,
        }
    }

    // -----------------------------------------------------------------------
    // Persisted configuration
    // -----------------------------------------------------------------------

    /// Re-read credentials and locator from the local store, migrating a
    /// legacy unscoped locator key first. An unreadable store counts as
    /// nothing persisted.
    pub fn restore_config(&mut self) {
        if let Some(legacy) = &self.keys.legacy_locator {
            if let Err(e) = self.local.migrate_legacy(legacy, &self.keys.locator) {
                warn!("could not migrate legacy key '{legacy}': {e}");
            }
        }

        self.config.credentials = self
            .read_record(&self.keys.credentials)
            .and_then(|raw| Credentials::new(&raw));
        self.config.locator = self.read_record(&self.keys.locator).and_then(|raw| {
            raw.parse::<RemoteLocator>()
                .map_err(|e| warn!("ignoring stored locator: {e}"))
                .ok()
        });
        debug!(
            configured = self.config.is_configured(),
            has_locator = self.config.locator.is_some(),
            "restored sync configuration"
        );
    }

    fn read_record(&self, key: &str) -> Option<String> {
        match self.local.read_local_record(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("local storage unavailable reading '{key}': {e}");
                None
            }
        }
    }

    /// The persisted locator, or the one the backend derives from the
    /// credentials.
    fn locator(&self) -> Option<RemoteLocator> {
        self.config.locator.clone().or_else(|| {
            self.config
                .credentials
                .as_ref()
                .and_then(|credentials| self.remote.fixed_locator(credentials))
        })
    }

    /// Store new credentials. Blank input is rejected.
    pub fn configure(&mut self, raw: &str) -> Result<(), SyncError> {
        let Some(credentials) = Credentials::new(raw) else {
            self.status = Some(StatusMessage::error("Please enter an API key."));
            return Err(SyncError::InvalidCredentials);
        };
        match self
            .local
            .write_local_record(&self.keys.credentials, credentials.expose())
        {
            Ok(()) => {
                self.status = Some(StatusMessage::ok("Credentials saved."));
                info!("remote credentials saved");
            }
            Err(e) => {
                warn!("could not persist credentials, keeping them for this session: {e}");
                self.status = Some(StatusMessage::ok("Credentials set for this session."));
            }
        }
        self.config.credentials = Some(credentials);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Startup
    // -----------------------------------------------------------------------

    /// Initial load: the remote record wins when it can be fetched, then the
    /// fragment, then all-false. The fragment is rewritten to match either way.
    pub async fn startup(&mut self) -> Result<StartupSource, SyncError> {
        self.ensure_idle()?;
        self.restore_config();

        let mut source = StartupSource::Empty;
        if let (true, Some(locator)) = (self.config.is_configured(), self.locator()) {
            self.busy = Some(Operation::Load);
            let fetched = self.remote.fetch_record(&locator).await;
            self.busy = None;
            match fetched {
                Ok(token) => {
                    self.apply_token(&token);
                    self.config.last_synced_token = Some(token);
                    source = StartupSource::Remote;
                }
                Err(e) => warn!("cloud load failed, falling back to the address: {e}"),
            }
        }

        if source == StartupSource::Empty {
            match self.local.read_fragment() {
                Ok(Some(token)) => {
                    self.apply_token(&token);
                    source = StartupSource::Fragment;
                }
                Ok(None) => {}
                Err(e) => warn!("could not read the address fragment: {e}"),
            }
        }

        if let Err(e) = self.write_fragment() {
            warn!("could not rewrite the address fragment: {e}");
        }
        info!(?source, checked = self.flags.count_checked(), "checklist loaded");
        Ok(source)
    }

    // -----------------------------------------------------------------------
    // Flag mutations
    // -----------------------------------------------------------------------

    /// Flip one item and return its new value.
    pub fn toggle(&mut self, index: usize) -> Result<bool, SyncError> {
        let value = self.flags.toggle(index).ok_or(SyncError::IndexOutOfRange {
            index,
            len: self.flags.len(),
        })?;
        self.after_mutation()?;
        Ok(value)
    }

    pub fn set_flag(&mut self, index: usize, value: bool) -> Result<(), SyncError> {
        if self.flags.set(index, value).is_none() {
            return Err(SyncError::IndexOutOfRange {
                index,
                len: self.flags.len(),
            });
        }
        self.after_mutation()
    }

    /// Replace the whole vector, e.g. from a rendered UI tree.
    pub fn set_flags(&mut self, flags: FlagVector) -> Result<(), SyncError> {
        if flags.len() != self.flags.len() {
            return Err(SyncError::LengthMismatch {
                expected: self.flags.len(),
                actual: flags.len(),
            });
        }
        self.flags = flags;
        self.after_mutation()
    }

    /// Press the "Clear Selections" / "Undo" control.
    pub fn clear_or_undo(&mut self) -> Result<ClearAction, SyncError> {
        let action = self.clear.press(&mut self.flags);
        self.after_mutation()?;
        Ok(action)
    }

    /// Re-apply the fragment after the address changed underneath us.
    /// Returns whether the address carried a token; when it did not, the
    /// current token is written back so the address keeps matching the flags.
    pub fn on_fragment_changed(&mut self) -> Result<bool, SyncError> {
        let Some(token) = self.local.read_fragment()? else {
            self.write_fragment()?;
            return Ok(false);
        };
        self.apply_token(&token);
        self.after_mutation()?;
        Ok(true)
    }

    /// Go to a pasted share link and apply its fragment.
    pub fn open_address(&mut self, address: PageAddress) -> Result<bool, SyncError> {
        self.local.navigate(address)?;
        self.on_fragment_changed()
    }

    fn apply_token(&mut self, token: &Token) {
        self.flags = codec::decode(token.as_str(), self.flags.len());
    }

    fn write_fragment(&mut self) -> Result<(), SyncError> {
        let token = self.token();
        self.local.write_fragment(&token)?;
        Ok(())
    }

    fn after_mutation(&mut self) -> Result<(), SyncError> {
        self.write_fragment()?;
        debug!(
            checked = self.flags.count_checked(),
            dirty = self.is_dirty(),
            "flags updated"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Explicit sync
    // -----------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<(), SyncError> {
        match self.busy {
            Some(operation) => Err(SyncError::Busy(operation)),
            None => Ok(()),
        }
    }

    /// Release the busy mark left by a ticket that was dropped, or a `sync`
    /// / `load` future that was cancelled, before it finished. Returns the
    /// operation that was abandoned.
    pub fn abandon(&mut self) -> Option<Operation> {
        let abandoned = self.busy.take();
        if let Some(operation) = abandoned {
            warn!("abandoned unfinished {operation}");
            self.status = Some(StatusMessage::error(format!(
                "The last {operation} did not finish."
            )));
        }
        abandoned
    }

    /// Capture the current token for upload and mark the coordinator busy.
    /// The ticket must be passed to [`finish_sync`](Self::finish_sync), or the
    /// coordinator stays busy until [`abandon`](Self::abandon) is called.
    pub fn begin_sync(&mut self) -> Result<SyncTicket, SyncError> {
        self.ensure_idle()?;
        let Some(credentials) = self.config.credentials.clone() else {
            self.status = Some(StatusMessage::error("No API key set."));
            return Err(RemoteError::NotConfigured("no credentials set".to_string()).into());
        };
        self.busy = Some(Operation::Sync);
        self.status = None;
        // Only a persisted locator means the record exists; a derived one
        // still goes through create so it gets persisted.
        Ok(SyncTicket {
            credentials,
            locator: self.config.locator.clone(),
            token: self.token(),
        })
    }

    /// Record the outcome of [`SyncTicket::execute`].
    pub fn finish_sync(
        &mut self,
        ticket: SyncTicket,
        result: Result<Option<RemoteLocator>, RemoteError>,
    ) -> Result<(), SyncError> {
        self.busy = None;
        match result {
            Ok(created) => {
                if let Some(locator) = created {
                    if let Err(e) = self
                        .local
                        .write_local_record(&self.keys.locator, &locator.to_string())
                    {
                        warn!("could not persist the new record locator: {e}");
                    }
                    info!("created remote record {locator}");
                    self.config.locator = Some(locator);
                }
                self.config.last_synced_token = Some(ticket.token);
                self.status = Some(StatusMessage::ok("Synced to cloud."));
                info!(dirty = self.is_dirty(), "synced to cloud");
                Ok(())
            }
            Err(e) => {
                warn!("sync failed: {e}");
                self.status = Some(StatusMessage::error(format!("Sync failed: {e}")));
                Err(e.into())
            }
        }
    }

    /// Push the current token to the remote record.
    pub async fn sync(&mut self) -> Result<(), SyncError> {
        let ticket = self.begin_sync()?;
        let result = ticket.execute(&self.remote).await;
        self.finish_sync(ticket, result)
    }

    // -----------------------------------------------------------------------
    // Explicit load
    // -----------------------------------------------------------------------

    /// Like [`begin_sync`](Self::begin_sync), the ticket must be finished or
    /// abandoned.
    pub fn begin_load(&mut self) -> Result<LoadTicket, SyncError> {
        self.ensure_idle()?;
        let Some(locator) = self.locator() else {
            self.status = Some(StatusMessage::error("No cloud data found. Sync first."));
            return Err(RemoteError::NotConfigured("no remote record yet".to_string()).into());
        };
        self.busy = Some(Operation::Load);
        self.status = None;
        Ok(LoadTicket { locator })
    }

    /// Apply the outcome of [`LoadTicket::execute`]. Unsynced local changes
    /// are overwritten.
    pub fn finish_load(
        &mut self,
        _ticket: LoadTicket,
        result: Result<Token, RemoteError>,
    ) -> Result<(), SyncError> {
        self.busy = None;
        match result {
            Ok(token) => {
                self.apply_token(&token);
                self.config.last_synced_token = Some(token);
                if let Err(e) = self.write_fragment() {
                    warn!("could not rewrite the address fragment: {e}");
                }
                self.status = Some(StatusMessage::ok("Loaded from cloud."));
                info!(checked = self.flags.count_checked(), "loaded from cloud");
                Ok(())
            }
            Err(e) => {
                warn!("load failed: {e}");
                self.status = Some(StatusMessage::error(format!("Load failed: {e}")));
                Err(e.into())
            }
        }
    }

    /// Replace the flags with the remote record.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        let ticket = self.begin_load()?;
        let result = ticket.execute(&self.remote).await;
        self.finish_load(ticket, result)
    }

    // -----------------------------------------------------------------------
    // Clear remote configuration
    // -----------------------------------------------------------------------

    /// Best-effort delete of the remote record, then forget credentials and
    /// locator. Local cleanup happens even when the delete fails.
    pub async fn clear_remote(&mut self) -> Result<(), SyncError> {
        self.ensure_idle()?;
        if let (Some(credentials), Some(locator)) =
            (self.config.credentials.clone(), self.locator())
        {
            self.busy = Some(Operation::Clear);
            let deleted = self.remote.delete_record(&credentials, &locator).await;
            self.busy = None;
            if let Err(e) = deleted {
                warn!("failed to delete remote record {locator}: {e}");
            }
        }

        for key in [&self.keys.credentials, &self.keys.locator] {
            if let Err(e) = self.local.delete_local_record(key) {
                warn!("could not remove '{key}': {e}");
            }
        }
        self.config = SyncConfig::default();
        self.status = Some(StatusMessage::ok("Cloud settings cleared."));
        info!("cloud settings cleared");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Session snapshots
    // -----------------------------------------------------------------------

    pub fn session(&self) -> Session {
        Session {
            token: self.token(),
            last_synced_token: self.config.last_synced_token.clone(),
            pending_undo: self.clear.pending().cloned(),
        }
    }

    /// Continue from a snapshot instead of running a startup load. The
    /// snapshot's synced token only survives while a remote record is still
    /// reachable; credentials cleared elsewhere leave the session clean.
    pub fn resume(&mut self, session: Session) -> Result<(), SyncError> {
        self.ensure_idle()?;
        self.restore_config();
        self.apply_token(&session.token);
        let reachable = self.config.is_configured() && self.locator().is_some();
        self.config.last_synced_token = session.last_synced_token.filter(|_| reachable);
        self.clear = session
            .pending_undo
            .map(ClearToggle::PendingUndo)
            .unwrap_or_default();
        self.write_fragment()
    }

    pub fn save_session(&self) -> Result<(), SyncError> {
        let json = serde_json::to_string(&self.session())?;
        self.local.write_local_record(&self.keys.session, &json)?;
        Ok(())
    }

    /// The stored snapshot, if any. An unreadable one is discarded.
    pub fn stored_session(&self) -> Option<Session> {
        let raw = self.read_record(&self.keys.session)?;
        serde_json::from_str(&raw)
            .map_err(|e| warn!("discarding unreadable session snapshot: {e}"))
            .ok()
    }

    pub fn discard_session(&self) -> Result<(), SyncError> {
        self.local.delete_local_record(&self.keys.session)?;
        Ok(())
    }
}
