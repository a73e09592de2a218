//! The terminal "page": a checklist definition plus its coordinator.
//!
//! A browser keeps the coordinator alive between clicks; here every command
//! opens the page, resumes the stored session, acts, and saves it again.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, warn};

use binder_core::{checklist::load_definition, ChecklistDefinition};
use binder_remote::{Backend, BackendKind, RemoteConfig};
use binder_store::{
    ChecklistIdentity, FileStore, FragmentChannel, LocalChannel, PageAddress, StoredAddress,
};
use binder_sync::{StorageKeys, SyncCoordinator, SyncError};

pub type Coordinator = SyncCoordinator<FileStore, StoredAddress<FileStore>, Backend>;

/// Arguments shared by every command that works on one checklist.
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Checklist definition JSON file; its file stem names the page.
    pub definition: PathBuf,

    /// Host (and optional path prefix) the page is published under.
    #[arg(long, default_value = "localhost")]
    pub site: String,

    /// Remote backend: jsonstorage | pantry.
    #[arg(long, env = "BINDER_BACKEND", default_value = "jsonstorage")]
    pub backend: BackendKind,

    /// Override the backend's base URL.
    #[arg(long = "remote-url", env = "BINDER_REMOTE_URL", value_name = "URL")]
    pub remote_url: Option<String>,
}

pub struct Page {
    pub definition: ChecklistDefinition,
    pub coordinator: Coordinator,
    runtime: tokio::runtime::Runtime,
}

impl PageArgs {
    /// `https://<site>/<definition stem>.html`.
    pub fn page_address(&self) -> Result<PageAddress> {
        let stem = self
            .definition
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("bad definition file name '{}'", self.definition.display()))?;
        let site = self.site.trim_end_matches('/');
        let raw = if site.contains("://") {
            format!("{site}/{stem}.html")
        } else {
            format!("https://{site}/{stem}.html")
        };
        raw.parse()
            .with_context(|| format!("invalid site '{}'", self.site))
    }

    pub fn open(&self) -> Result<Page> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        self.open_at(&home)
    }

    /// Open without resuming or loading anything.
    pub fn open_at(&self, home: &Path) -> Result<Page> {
        let definition = load_definition(&self.definition)
            .with_context(|| format!("failed to load checklist '{}'", self.definition.display()))?;
        let address = self.page_address()?;
        let identity = ChecklistIdentity::from_address(&address);
        let keys = StorageKeys::new(self.backend, &identity);

        let store = FileStore::open_at(home);
        let mut fragment = StoredAddress::new(store.clone(), keys.address.clone(), address.clone());
        move_to_site(&mut fragment, &address);
        let remote = RemoteConfig {
            backend: self.backend,
            base_url: self.remote_url.clone(),
        }
        .build(&identity.basket_name());
        debug!(backend = %self.backend, set = identity.set_name(), "opening page");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;

        Ok(Page {
            coordinator: SyncCoordinator::new(
                definition.len(),
                LocalChannel::new(store, fragment),
                remote,
                keys,
            ),
            definition,
            runtime,
        })
    }

    /// Open and bring the page to its current state.
    pub fn open_resumed(&self) -> Result<Page> {
        let mut page = self.open()?;
        page.resume_or_start()?;
        Ok(page)
    }
}

/// Keep the stored token but put it under the page address for the current
/// `--site`.
fn move_to_site(fragment: &mut StoredAddress<FileStore>, address: &PageAddress) {
    let stored = match fragment.address() {
        Ok(stored) => stored,
        Err(e) => {
            warn!("could not read the stored page address: {e}");
            return;
        }
    };
    if stored.scheme == address.scheme && stored.host == address.host && stored.path == address.path
    {
        return;
    }
    let moved = match stored.fragment.as_deref() {
        Some(token) => address.with_fragment(token),
        None => address.clone(),
    };
    debug!(from = %stored, to = %moved, "page moved to a new site");
    if let Err(e) = fragment.replace_address(moved) {
        warn!("could not store the new page address: {e}");
    }
}

impl Page {
    /// Resume the stored session, or run a startup load when there is none.
    pub fn resume_or_start(&mut self) -> Result<()> {
        match self.coordinator.stored_session() {
            Some(session) => self
                .coordinator
                .resume(session)
                .context("failed to resume session")?,
            None => self.start()?,
        }
        Ok(())
    }

    /// Startup load: remote record, then address fragment, then blank.
    pub fn start(&mut self) -> Result<()> {
        let source = self
            .runtime
            .block_on(self.coordinator.startup())
            .context("failed to load checklist state")?;
        debug!(?source, "started fresh session");
        Ok(())
    }

    pub fn sync(&mut self) -> Result<(), SyncError> {
        self.runtime.block_on(self.coordinator.sync())
    }

    pub fn load(&mut self) -> Result<(), SyncError> {
        self.runtime.block_on(self.coordinator.load())
    }

    pub fn clear_remote(&mut self) -> Result<(), SyncError> {
        self.runtime.block_on(self.coordinator.clear_remote())
    }

    pub fn save(&self) -> Result<()> {
        self.coordinator
            .save_session()
            .context("failed to save session")
    }

    /// Flag Vector index for an item id such as `C-10`.
    pub fn item_index(&self, id: &str) -> Result<usize> {
        self.definition
            .find(id)
            .with_context(|| format!("no item '{id}' in '{}'", self.definition.title))
    }

    pub fn share_link(&self) -> Result<String> {
        Ok(self
            .coordinator
            .address()
            .context("failed to read page address")?
            .to_string())
    }
}
