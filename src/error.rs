//! Error types.
//!
//! Per-file problems never surface here: an unreadable or oversized file is
//! reported as a [`Finding`](crate::finding::Finding) and the walk continues.
//! The errors below are the ones that make a whole run untrustworthy.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while building a rule catalog from its encoded table.
///
/// Any of these aborts the run before a single file is read: findings
/// produced by a partially built catalog could not be trusted.
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("rule {id}: pattern literal is not valid base64")]
    Decode {
        id: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("rule {id}: decoded pattern is not valid UTF-8")]
    NotUtf8 {
        id: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("rule {id}: pattern failed to compile")]
    Compile {
        id: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Failure while loading or validating a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Crate-level error returned by [`audit::run_audit`](crate::audit::run_audit)
/// and [`output::format_report`](crate::output::format_report).
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("skill path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to serialize report")]
    Serialize(#[from] serde_json::Error),
}
