//! Ledger and registry persistence
//!
//! This crate provides:
//! - Ledger document (latest snapshot + append-only diff history)
//! - Ledger store with merge-on-save and atomic writes
//! - Corruption recovery through a caller-supplied resolver
//! - Registry document (`tracked.json`) listing every tracked file

pub mod error;
pub mod ledger;
pub mod recovery;
pub mod registry;
pub mod store;

// Re-exports
pub use error::{LedgerError, RegistryError};
pub use ledger::{Ledger, RevisionSummary};
pub use recovery::{CorruptLedger, CorruptionResolver, Recovery, Resolution};
pub use registry::{Registry, RegistryEntry, DEFAULT_HOST_NODE};
pub use store::{atomic_write, LedgerStore};

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
