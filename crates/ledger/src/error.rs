//! Error types for ledger and registry documents

use cedge_core::ReconstructError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reading, recovering or writing a ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The persisted ledger cannot be parsed or fails validation
    #[error("ledger {} is corrupt: {reason}", .path.display())]
    Corrupt {
        base_uuid: String,
        path: PathBuf,
        reason: String,
    },

    /// The resolver declined to overwrite a corrupt ledger
    #[error("overwrite of corrupt ledger {base_uuid} was declined")]
    Aborted { base_uuid: String },

    /// A merge would break the ledger's ordering or op invariants
    #[error("refusing to write ledger {base_uuid}: {reason}")]
    Rejected { base_uuid: String, reason: String },

    /// The diff history does not replay against the snapshot
    #[error("ledger {base_uuid} cannot be replayed: {source}")]
    Replay {
        base_uuid: String,
        #[source]
        source: ReconstructError,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failure reading or writing the registry document
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no registry found at {}; run `cedge register` first", .path.display())]
    Missing { path: PathBuf },

    #[error("a registry already exists at {}; use `cedge add` to update it", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("registry {} is invalid: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode registry: {0}")]
    Encode(#[from] serde_json::Error),
}
