//! Commands that read or change one checklist's flags.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use binder_core::{ClearAction, Progress, ProgressReport};
use binder_store::PageAddress;
use binder_sync::SyncState;

use super::page::{Page, PageArgs};

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusJson {
    title: String,
    address: String,
    token: String,
    state: &'static str,
    dirty: bool,
    overall: ProgressJson,
    categories: Vec<CategoryJson>,
    checked: Vec<String>,
}

#[derive(Serialize)]
struct ProgressJson {
    checked: usize,
    total: usize,
    percent: usize,
}

impl From<Progress> for ProgressJson {
    fn from(p: Progress) -> Self {
        Self {
            checked: p.checked,
            total: p.total,
            percent: p.percent(),
        }
    }
}

#[derive(Serialize)]
struct CategoryJson {
    name: String,
    tab_id: String,
    #[serde(flatten)]
    progress: ProgressJson,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "category")]
    category: String,
    #[tabled(rename = "collected")]
    collected: String,
    #[tabled(rename = "%")]
    percent: usize,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let page = self.page.open_resumed()?;
        let report = ProgressReport::compute(&page.definition, page.coordinator.flags());
        let checked = checked_ids(&page);

        if self.json {
            let payload = StatusJson {
                title: page.definition.title.clone(),
                address: page.share_link()?,
                token: page.coordinator.token().into_inner(),
                state: state_key(page.coordinator.state()),
                dirty: page.coordinator.is_dirty(),
                overall: report.overall.into(),
                categories: report
                    .categories
                    .into_iter()
                    .map(|c| CategoryJson {
                        name: c.name,
                        tab_id: c.tab_id,
                        progress: c.progress.into(),
                    })
                    .collect(),
                checked,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
            );
        } else {
            print_status(&page, report);
        }
        page.save()?;
        Ok(())
    }
}

fn print_status(page: &Page, report: ProgressReport) {
    println!(
        "{} | {}/{} collected ({}%)",
        page.definition.title.bold(),
        report.overall.checked,
        report.overall.total,
        report.overall.percent(),
    );

    let rows: Vec<CategoryRow> = page
        .definition
        .categories
        .iter()
        .zip(report.categories)
        .map(|(category, progress)| CategoryRow {
            category: category.heading(),
            collected: format!("{}/{}", progress.progress.checked, progress.progress.total),
            percent: progress.progress.percent(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let state = page.coordinator.state();
    println!("Cloud: {}", state_label(state));
    if page.coordinator.is_dirty() {
        println!(
            "{}",
            "You have unsynced changes. Run 'binder remote sync' to upload them.".yellow()
        );
    }
}

fn checked_ids(page: &Page) -> Vec<String> {
    let flags = page.coordinator.flags();
    page.definition
        .items()
        .filter(|item| flags.get(item.index) == Some(true))
        .map(|item| item.id())
        .collect()
}

fn state_key(state: SyncState) -> &'static str {
    match state {
        SyncState::Unconfigured => "unconfigured",
        SyncState::ConfiguredClean => "clean",
        SyncState::ConfiguredDirty => "dirty",
        SyncState::Syncing => "syncing",
        SyncState::Loading => "loading",
    }
}

fn state_label(state: SyncState) -> String {
    match state {
        SyncState::Unconfigured => "not configured".bright_black().to_string(),
        SyncState::ConfiguredClean => "in sync".green().to_string(),
        SyncState::ConfiguredDirty => "unsynced changes".yellow().to_string(),
        SyncState::Syncing => "syncing".cyan().to_string(),
        SyncState::Loading => "loading".cyan().to_string(),
    }
}

// ---------------------------------------------------------------------------
// toggle / check / uncheck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum MarkMode {
    Toggle,
    Check,
    Uncheck,
}

#[derive(Args, Debug)]
pub struct MarkArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Item ids such as `C-10` (case-insensitive).
    #[arg(required = true, value_name = "ID")]
    pub ids: Vec<String>,
}

impl MarkArgs {
    pub fn run(self, mode: MarkMode) -> Result<()> {
        let mut page = self.page.open_resumed()?;

        // Resolve every id first so a typo changes nothing.
        let indices = self
            .ids
            .iter()
            .map(|id| page.item_index(id))
            .collect::<Result<Vec<_>>>()?;

        for (id, index) in self.ids.iter().zip(indices) {
            let value = match mode {
                MarkMode::Toggle => page.coordinator.toggle(index)?,
                MarkMode::Check => {
                    page.coordinator.set_flag(index, true)?;
                    true
                }
                MarkMode::Uncheck => {
                    page.coordinator.set_flag(index, false)?;
                    false
                }
            };
            if value {
                println!("{} {id}", "✓".green());
            } else {
                println!("{} {id}", "○".bright_black());
            }
        }

        page.save()?;
        println!("{}", page.share_link()?);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ClearArgs {
    #[command(flatten)]
    pub page: PageArgs,
}

impl ClearArgs {
    pub fn run(self) -> Result<()> {
        let mut page = self.page.open_resumed()?;
        let action = page.coordinator.clear_or_undo()?;
        page.save()?;

        match action {
            ClearAction::Cleared => println!(
                "Cleared all selections. Run 'binder clear' again to undo."
            ),
            ClearAction::Restored => println!(
                "Restored {} selections.",
                page.coordinator.flags().count_checked()
            ),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// share
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ShareArgs {
    #[command(flatten)]
    pub page: PageArgs,
}

impl ShareArgs {
    pub fn run(self) -> Result<()> {
        let page = self.page.open_resumed()?;
        page.save()?;
        println!("{}", page.share_link()?);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// open
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct OpenArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// A full share link, or just `#<token>`.
    #[arg(value_name = "ADDRESS")]
    pub address: String,
}

impl OpenArgs {
    pub fn run(self) -> Result<()> {
        let mut page = self.page.open_resumed()?;
        let address = match self.address.strip_prefix('#') {
            Some(token) => page
                .coordinator
                .address()
                .context("failed to read page address")?
                .with_fragment(token),
            None => self
                .address
                .parse::<PageAddress>()
                .with_context(|| format!("invalid address '{}'", self.address))?,
        };

        let applied = page.coordinator.open_address(address)?;
        page.save()?;
        if applied {
            println!(
                "Loaded {} selections from the link.",
                page.coordinator.flags().count_checked()
            );
        } else {
            println!("The link carries no selections; nothing changed.");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// reload
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ReloadArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Reload even when there are unsynced changes.
    #[arg(long)]
    pub force: bool,
}

impl ReloadArgs {
    pub fn run(self) -> Result<()> {
        let mut page = self.page.open()?;
        if let Some(session) = page.coordinator.stored_session() {
            page.coordinator
                .resume(session)
                .context("failed to resume session")?;
            if page.coordinator.is_dirty() && !self.force {
                bail!(
                    "you have unsynced changes; run 'binder remote sync' first or pass --force"
                );
            }
            page.coordinator
                .discard_session()
                .context("failed to discard session")?;
            page = self.page.open()?;
        }

        page.start()?;
        page.save()?;
        println!(
            "Reloaded '{}': {}/{} collected.",
            page.definition.title,
            page.coordinator.flags().count_checked(),
            page.definition.len()
        );
        Ok(())
    }
}
