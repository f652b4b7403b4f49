//! Content-independent identifiers for tracked files
//!
//! Identifiers are built from short SHA-1 fingerprints:
//! ```text
//! base_uuid = digest(project) "-" digest(path)
//! full_uuid = base_uuid "-" unix_seconds
//! ```
//! `base_uuid` never changes for a (project, path) pair. `full_uuid` is
//! refreshed on every revision bump and may coincide for two calls made in
//! the same second, so it is only unique together with the version number.

use sha1::{Digest, Sha1};
use std::time::{SystemTime, UNIX_EPOCH};

/// Number of hex characters kept from the SHA-1 digest
pub const DIGEST_LEN: usize = 12;

/// Short SHA-1 fingerprint of a string (first 12 lowercase hex characters)
pub fn digest(input: &str) -> String {
    let hash = Sha1::digest(input.as_bytes());
    let mut hex = hex::encode(hash);
    hex.truncate(DIGEST_LEN);
    hex
}

/// Stable identifier for a file within a project
pub fn base_uuid(project: &str, path: &str) -> String {
    format!("{}-{}", digest(project), digest(path))
}

/// Revision identifier stamped with the current wall-clock second
pub fn full_uuid(project: &str, path: &str) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    full_uuid_at(project, path, secs)
}

/// Revision identifier stamped with an explicit unix timestamp
pub fn full_uuid_at(project: &str, path: &str, unix_secs: u64) -> String {
    format!("{}-{}", base_uuid(project, path), unix_secs)
}
