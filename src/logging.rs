// src/logging.rs

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// Logs go to stderr so stdout only carries per-file outcomes.
pub fn init(verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(build_filter(verbose, rust_log.as_deref()))
        .try_init();
}

/// RUST_LOG when set and valid, else WARN. `verbose` adds a DEBUG directive
/// on top of either.
fn build_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let from_env = rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok());

    match (from_env, verbose) {
        (Some(filter), false) => filter,
        (Some(filter), true) => filter.add_directive(tracing::Level::DEBUG.into()),
        (None, false) => EnvFilter::new("warn"),
        (None, true) => EnvFilter::new("debug"),
    }
}
