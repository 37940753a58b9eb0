// src/main.rs

//! grist-sync
//!
//! Keeps local component files in step with the rows of a Grist table,
//! keyed by `template_id` (the file name).
//!
//! - `push` creates or updates one row per file
//! - `diff` reports whether each file matches its row
//!
//! This file only parses arguments, sets up logging and maps errors to the
//! exit code. Everything else lives in `runner`.

mod cli;
mod client;
mod config;
mod env;
mod error;
mod files;
mod logging;
mod runner;
mod sync;

use clap::Parser;
use error::ConfigError;

/// Program entry point.
///
/// Files are processed one after another; Tokio only drives the HTTP client.
#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = runner::run(cli).await {
        match err.downcast_ref::<ConfigError>() {
            Some(cfg) => eprintln!("Config error: {}", cfg),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}
