// src/runner.rs

use crate::cli::{Cli, Command, SyncArgs};
use crate::client::{HttpTransport, RecordClient};
use crate::config::{EnvConfig, SyncConfig};
use crate::env::{load_dotenv, EnvMap};
use crate::files::resolve_files;
use crate::sync::{diff_component, push_component};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Everything resolved before the first network call.
#[derive(Debug)]
pub struct Prepared {
    pub env: EnvConfig,
    pub files: Vec<PathBuf>,
}

/// Entry point from `main.rs`.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Push(args) => {
            let prepared = prepare(&args, EnvMap::from_process())?;
            let client = RecordClient::new(&prepared.env, HttpTransport::new());
            tracing::debug!(url = client.records_url(), "using records endpoint");

            for file in &prepared.files {
                let outcome = push_component(&client, file).await?;
                println!("{}", outcome);
            }
            Ok(())
        }

        Command::Diff(args) => {
            let prepared = prepare(&args, EnvMap::from_process())?;
            let client = RecordClient::new(&prepared.env, HttpTransport::new());
            tracing::debug!(url = client.records_url(), "using records endpoint");

            for file in &prepared.files {
                let outcome = diff_component(&client, file).await?;
                println!("{}", outcome);
            }
            Ok(())
        }
    }
}

/// Resolve dotenv, config, environment and files, in that order.
///
/// `env` is the starting environment; the dotenv file only fills gaps in it.
pub fn prepare(args: &SyncArgs, mut env: EnvMap) -> Result<Prepared> {
    load_dotenv(&args.dotenv, &mut env)?;

    let cfg = SyncConfig::load(&args.config)?;
    let env_cfg = cfg.resolve(&args.env, &env)?;

    let files = resolve_files(&args.files, args.all, Path::new(&cfg.components_dir))?;

    tracing::debug!(
        env = %args.env,
        base_url = %env_cfg.base_url,
        api_key_env = %env_cfg.api_key_env,
        files = files.len(),
        "resolved sync target"
    );

    Ok(Prepared {
        env: env_cfg,
        files,
    })
}
