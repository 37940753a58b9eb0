// src/cli.rs

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sync Grist components between local files and a Grist table.
///
/// Each file name is used verbatim as the `template_id` of its row.
#[derive(Parser, Debug)]
#[command(name = "grist-sync", version, disable_help_subcommand = true)]
pub struct Cli {
    /// Log debug output (HTTP requests, resolved files) to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// All supported CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Push one or more components (create or update their rows).
    Push(SyncArgs),

    /// Compare local components against their rows in Grist.
    Diff(SyncArgs),
}

/// Flags shared by `push` and `diff`.
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Path to config file
    ///
    /// Defaults to ./grist_sync.config.json
    #[arg(long, default_value = "grist_sync.config.json")]
    pub config: PathBuf,

    /// Environment name (key under `envs` in the config)
    #[arg(long = "env")]
    pub env: String,

    /// Path to a .env file loaded before the config is resolved
    #[arg(long, default_value = ".env")]
    pub dotenv: PathBuf,

    /// Process every file in `components_dir`
    #[arg(long)]
    pub all: bool,

    /// Component files to process, in order
    pub files: Vec<PathBuf>,
}
