// src/env.rs

//! Environment variables as an explicit value.
//!
//! The process environment is snapshotted once into an `EnvMap`. The `.env`
//! loader merges into that map, and config resolution reads from it, so the
//! global process environment is never mutated.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct EnvMap {
    vars: BTreeMap<String, String>,
}

impl EnvMap {
    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Set `key` only if it is not present yet. Returns whether it was set.
    pub fn set_if_absent(&mut self, key: &str, value: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.vars.insert(key.to_string(), value.to_string());
        true
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Merge a simple `KEY=value` file into `env`.
///
/// A missing file is a no-op. Blank lines, `#` comments and lines without `=`
/// are skipped. Values are trimmed and stripped of surrounding quotes; there is
/// no interpolation, escaping or multi-line support. Existing keys win.
///
/// Returns the number of variables added.
pub fn load_dotenv(path: &Path, env: &mut EnvMap) -> Result<usize> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no dotenv file");
        return Ok(0);
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dotenv file {:?}", path))?;

    let mut added = 0;
    for (key, value) in raw.lines().filter_map(parse_line) {
        if env.set_if_absent(key, value) {
            added += 1;
        }
    }

    tracing::debug!(path = %path.display(), added, "loaded dotenv file");
    Ok(added)
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let value = value.trim().trim_matches('"').trim_matches('\'');
    Some((key, value))
}
