//! Line-level revision engine for CEDGE
//!
//! This crate provides:
//! - Stable file identities (SHA-1 fingerprints of project and path)
//! - Line differ producing insert/delete/modify operations
//! - Reconstruction of historical revisions by reversing those operations

pub mod diff;
pub mod identity;
pub mod reconstruct;

// Re-exports
pub use diff::{compute_diffs, join_lines, split_lines, DiffKind, DiffOp, InvalidDiffOp};
pub use identity::{base_uuid, digest, full_uuid, full_uuid_at};
pub use reconstruct::{content_at, reconstruct, ReconstructError};
