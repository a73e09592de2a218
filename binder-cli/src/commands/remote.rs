//! `binder remote configure|sync|load|clear`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use binder_sync::SyncError;

use super::page::{Page, PageArgs};

#[derive(Subcommand, Debug)]
pub enum RemoteCommand {
    /// Save the API key (JSONStorage) or Pantry ID used for sync.
    Configure(ConfigureArgs),

    /// Upload the current selections to the cloud record.
    Sync(RemoteArgs),

    /// Replace local selections with the cloud record.
    Load(RemoteArgs),

    /// Delete the cloud record (best effort) and forget the credentials.
    Clear(RemoteArgs),
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// API key or account id.
    #[arg(value_name = "KEY")]
    pub key: String,
}

#[derive(Args, Debug)]
pub struct RemoteArgs {
    #[command(flatten)]
    pub page: PageArgs,
}

pub fn run(command: RemoteCommand) -> Result<()> {
    match command {
        RemoteCommand::Configure(args) => {
            let mut page = args.page.open_resumed()?;
            let result = page.coordinator.configure(&args.key);
            finish(page, result)
        }
        RemoteCommand::Sync(args) => {
            let mut page = args.page.open_resumed()?;
            let result = page.sync();
            finish(page, result)
        }
        RemoteCommand::Load(args) => {
            let mut page = args.page.open_resumed()?;
            let result = page.load();
            finish(page, result)
        }
        RemoteCommand::Clear(args) => {
            let mut page = args.page.open_resumed()?;
            let result = page.clear_remote();
            finish(page, result)
        }
    }
}

/// Save the session, print the coordinator's status line, and turn a failed
/// operation into the command's error.
fn finish(page: Page, result: Result<(), SyncError>) -> Result<()> {
    page.save()?;
    let status = page.coordinator.status().cloned();
    match result {
        Ok(()) => {
            if let Some(status) = status {
                println!("{} {status}", "✓".green());
            }
            Ok(())
        }
        Err(e) => {
            let message = status
                .map(|s| s.text)
                .unwrap_or_else(|| "remote operation failed".to_string());
            Err(e).context(message)
        }
    }
}
