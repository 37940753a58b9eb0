// src/config.rs

use crate::env::EnvMap;
use crate::error::ConfigError;

use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};

const DEFAULT_COMPONENTS_DIR: &str = "grist/composants";

/// Root configuration loaded from `grist_sync.config.json`.
///
/// Example:
///
/// {
///   "envs": {
///     "dev": {
///       "base_url": "https://docs.getgrist.com",
///       "doc_id": "your-doc-id",
///       "api_key_env": "GRIST_API_KEY_DEV",
///       "table_id": "Application_Composants"
///     }
///   },
///   "components_dir": "grist/composants"
/// }
#[derive(Debug, Deserialize)]
pub struct SyncConfig {
    /// Named deployment targets (dev, prod, ...)
    #[serde(default)]
    pub envs: BTreeMap<String, EnvEntry>,

    /// Directory holding one file per component
    #[serde(default = "default_components_dir")]
    pub components_dir: String,
}

/// One environment as written in the config file.
///
/// Every field is optional here; presence is checked by [`SyncConfig::resolve`]
/// so a missing key gets a precise error instead of a serde message.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct EnvEntry {
    pub base_url: Option<String>,
    pub doc_id: Option<String>,
    pub api_key_env: Option<String>,
    pub table_id: Option<String>,
}

/// A fully resolved environment, including the API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub base_url: String,
    pub doc_id: String,
    pub api_key_env: String,
    pub table_id: String,
    pub api_key: String,
}

fn default_components_dir() -> String {
    DEFAULT_COMPONENTS_DIR.to_string()
}

impl SyncConfig {
    /// Load and parse the JSON config from disk.
    ///
    /// Environment contents are not validated here.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve environment `name`, reading its API key from `env`.
    pub fn resolve(&self, name: &str, env: &EnvMap) -> Result<EnvConfig, ConfigError> {
        let entry = self
            .envs
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                name: name.to_string(),
                available: self.envs.keys().cloned().collect::<Vec<_>>().join(", "),
            })?;

        let require = |key: &'static str, value: &Option<String>| {
            value.clone().ok_or_else(|| ConfigError::MissingKey {
                env: name.to_string(),
                key,
            })
        };

        let base_url = require("base_url", &entry.base_url)?;
        let doc_id = require("doc_id", &entry.doc_id)?;
        let api_key_env = require("api_key_env", &entry.api_key_env)?;
        let table_id = require("table_id", &entry.table_id)?;

        let api_key = match env.get(&api_key_env) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => return Err(ConfigError::MissingCredential(api_key_env)),
        };

        Ok(EnvConfig {
            base_url,
            doc_id,
            api_key_env,
            table_id,
            api_key,
        })
    }
}
