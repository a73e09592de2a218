//! Binder — checklist progress tracker with shareable links and cloud sync.
//!
//! # Usage
//!
//! ```text
//! binder status <definition.json> [--json]
//! binder toggle|check|uncheck <definition.json> <ID>...
//! binder clear <definition.json>
//! binder share <definition.json>
//! binder open <definition.json> <ADDRESS | #TOKEN>
//! binder reload <definition.json> [--force]
//! binder remote configure|sync|load|clear <definition.json> ...
//! binder new <TITLE> [--slug ..] [--data-dir ..] [--base] [--category NAME=PREFIX[;ODDS]]...
//! ```
//!
//! Every checklist command also takes `--site`, `--backend` and `--remote-url`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    checklist::{ClearArgs, MarkArgs, MarkMode, OpenArgs, ReloadArgs, ShareArgs, StatusArgs},
    new::NewArgs,
    remote::RemoteCommand,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "binder",
    version,
    about = "Track checklist progress, share it as a link and sync it to the cloud",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show progress per category and the sync state.
    Status(StatusArgs),

    /// Flip the given items.
    Toggle(MarkArgs),

    /// Mark the given items as collected.
    Check(MarkArgs),

    /// Mark the given items as missing.
    Uncheck(MarkArgs),

    /// Clear every selection, or undo the last clear.
    Clear(ClearArgs),

    /// Print the shareable page address for the current state.
    Share(ShareArgs),

    /// Apply a pasted share link or `#token`.
    Open(OpenArgs),

    /// Reload from the cloud record (or the address) like a fresh page load.
    Reload(ReloadArgs),

    /// Configure and drive cloud sync.
    Remote {
        #[command(subcommand)]
        command: RemoteCommand,
    },

    /// Scaffold a new, empty checklist definition.
    New(NewArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Status(args) => args.run(),
        Commands::Toggle(args) => args.run(MarkMode::Toggle),
        Commands::Check(args) => args.run(MarkMode::Check),
        Commands::Uncheck(args) => args.run(MarkMode::Uncheck),
        Commands::Clear(args) => args.run(),
        Commands::Share(args) => args.run(),
        Commands::Open(args) => args.run(),
        Commands::Reload(args) => args.run(),
        Commands::Remote { command } => commands::remote::run(command),
        Commands::New(args) => args.run(),
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
