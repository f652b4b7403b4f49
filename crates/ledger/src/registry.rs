//! Registry of tracked files (`.cedge/tracked/tracked.json`)

use crate::error::RegistryError;
use crate::store::atomic_write;
use cedge_core::identity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

/// Host node recorded for a freshly registered root
pub const DEFAULT_HOST_NODE: &str = "http://localhost:9001";

/// One tracked file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryEntry {
    /// Identifier of the current revision
    #[serde(rename = "uuid")]
    pub full_uuid: String,
    /// Identifier shared by every revision
    pub base_uuid: String,
    pub project: String,
    /// Path relative to the root, `/`-separated
    pub filename: String,
    /// Revision number, starting at 1
    pub version: u64,
    /// Modification time (unix seconds) when the revision was recorded
    pub mtime: f64,
}

impl RegistryEntry {
    /// Entry for a newly tracked file at version 1
    pub fn new(project: &str, filename: &str, mtime: f64) -> Self {
        Self {
            full_uuid: identity::full_uuid(project, filename),
            base_uuid: identity::base_uuid(project, filename),
            project: project.to_string(),
            filename: filename.to_string(),
            version: 1,
            mtime,
        }
    }

    /// Record a new revision observed at `mtime`
    pub fn advance(&mut self, mtime: f64) {
        self.version += 1;
        self.mtime = mtime;
        self.full_uuid = identity::full_uuid(&self.project, &self.filename);
    }
}

/// Every file tracked under one root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Registry {
    /// URL of the coordinating host
    pub host_node: String,
    pub files: Vec<RegistryEntry>,
}

impl Registry {
    /// Create an empty registry
    pub fn new(host_node: impl Into<String>) -> Self {
        Self {
            host_node: host_node.into(),
            files: Vec::new(),
        }
    }

    /// Load and validate the registry at `path`
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RegistryError::Missing {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(RegistryError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let invalid = |reason: String| RegistryError::Invalid {
            path: path.to_path_buf(),
            reason,
        };

        let registry: Registry =
            serde_json::from_slice(&bytes).map_err(|e| invalid(e.to_string()))?;
        registry.validate().map_err(invalid)?;
        Ok(registry)
    }

    /// Write the registry atomically
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        let bytes = serde_json::to_vec_pretty(self)?;
        atomic_write(path, &bytes).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check versions, mtimes and base_uuid uniqueness
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for entry in &self.files {
            if entry.version == 0 {
                return Err(format!("{} has version 0", entry.filename));
            }
            if !entry.mtime.is_finite() {
                return Err(format!("{} has a non-finite mtime", entry.filename));
            }
            if !seen.insert(entry.base_uuid.as_str()) {
                return Err(format!("duplicate base_uuid {}", entry.base_uuid));
            }
        }
        Ok(())
    }

    /// Get an entry by its relative path
    pub fn find_by_filename(&self, filename: &str) -> Option<&RegistryEntry> {
        self.files.iter().find(|e| e.filename == filename)
    }

    /// Entries whose path lies under `prefix` (a `/`-separated directory)
    pub fn under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a RegistryEntry> + 'a {
        let prefix = prefix.trim_end_matches('/');
        self.files.iter().filter(move |e| {
            prefix.is_empty()
                || e.filename == prefix
                || e.filename
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}
