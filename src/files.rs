// src/files.rs

use crate::error::ConfigError;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolve the set of component files to process.
///
/// The components directory must exist whichever mode is used. With `all`,
/// every regular file directly inside it is returned, sorted by name.
/// Otherwise `explicit` is returned as given; missing files surface later
/// when they are read.
pub fn resolve_files(
    explicit: &[PathBuf],
    all: bool,
    components_dir: &Path,
) -> Result<Vec<PathBuf>> {
    if !components_dir.is_dir() {
        return Err(ConfigError::ComponentsDirMissing(components_dir.to_path_buf()).into());
    }

    if all {
        return list_component_files(components_dir);
    }

    if explicit.is_empty() {
        return Err(ConfigError::NoFiles.into());
    }

    Ok(explicit.to_vec())
}

/// List regular files directly inside `dir`, sorted by file name.
pub fn list_component_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Failed to list components directory {:?}", dir))?;

        // Follows symlinks, unlike `entry.file_type()`.
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// The remote `template_id` for a component file: its file name, verbatim.
pub fn template_id(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Cannot derive a template_id from {:?}", path))
}

/// Read a component file as UTF-8 text.
pub fn read_component(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read component file {:?}", path))
}
