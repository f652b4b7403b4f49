//! Error types for scanning and history lookups

use cedge_ledger::{LedgerError, RegistryError};
use std::path::PathBuf;
use thiserror::Error;

/// Failure loading `.cedge/config.toml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid host_node {0:?}: expected an http:// or https:// URL")]
    HostNode(String),
}

/// Failure that stops a whole scan
///
/// Problems with individual files never surface here; they are recorded in
/// the scan report instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load ignore rules: {0}")]
    Ignore(#[from] ::ignore::Error),

    #[error("failed to list projects in {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure looking up the history of one tracked file
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("{0} is not tracked")]
    NotTracked(String),

    #[error("no ledger recorded for {0}")]
    MissingLedger(String),

    #[error("{filename} has no revision {requested} (recorded: v{earliest} to v{latest})")]
    UnknownRevision {
        filename: String,
        requested: u64,
        earliest: u64,
        latest: u64,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
