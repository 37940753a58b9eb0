// src/error.rs

//! Error taxonomy.
//!
//! `ConfigError` covers everything that must stop the tool before any
//! network call is made. `HttpError` wraps a non-success response from Grist.

use reqwest::{Method, StatusCode};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("environment '{name}' is not defined in the config (available: {available})")]
    UnknownEnvironment { name: String, available: String },

    #[error("missing key '{key}' for environment '{env}'")]
    MissingKey { env: String, key: &'static str },

    #[error("environment variable {0} is not set")]
    MissingCredential(String),

    #[error("components directory not found: {}", .0.display())]
    ComponentsDirMissing(PathBuf),

    #[error("specify component files or --all")]
    NoFiles,
}

#[derive(Debug, Error)]
#[error("HTTP {status} on {method} {url}: {body}")]
pub struct HttpError {
    pub status: StatusCode,
    pub method: Method,
    pub url: String,
    pub body: String,
}
