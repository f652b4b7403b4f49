//! Read-only view of one tracked file's revisions

use crate::config::Config;
use crate::error::HistoryError;
use cedge_ledger::{Ledger, LedgerError, LedgerStore, Registry, RegistryEntry, RevisionSummary};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Registry entry and ledger for a tracked file
#[derive(Debug, Clone)]
pub struct History {
    pub entry: RegistryEntry,
    pub ledger: Ledger,
    /// Absolute path of the live file
    pub path: PathBuf,
}

impl History {
    /// Resolve `filename` (root-relative, `/`-separated) through the registry
    pub fn open(config: &Config, filename: &str) -> Result<Self, HistoryError> {
        let registry = Registry::load(&config.registry_path)?;
        Self::from_registry(config, &registry, filename)
    }

    /// Like [`History::open`] with an already loaded registry
    pub fn from_registry(
        config: &Config,
        registry: &Registry,
        filename: &str,
    ) -> Result<Self, HistoryError> {
        let entry = registry
            .find_by_filename(filename)
            .cloned()
            .ok_or_else(|| HistoryError::NotTracked(filename.to_string()))?;

        let store = LedgerStore::new(config.ledger_dir.clone());
        if !store.exists(&entry.base_uuid) {
            return Err(HistoryError::MissingLedger(filename.to_string()));
        }
        let ledger = store.load(&entry.base_uuid)?;

        Ok(Self {
            path: config.root.join(filename),
            entry,
            ledger,
        })
    }

    /// Version of the most recent recorded revision
    pub fn current_version(&self) -> u64 {
        self.entry.version
    }

    /// Oldest revision the ledger can reproduce
    ///
    /// Above 1 once a corrupt ledger has been overwritten.
    pub fn earliest_version(&self) -> u64 {
        self.revisions()
            .first()
            .map(|r| r.version)
            .unwrap_or(self.current_version())
    }

    /// Content of a recorded revision (earliest..=current)
    pub fn content_at(&self, version: u64) -> Result<String, HistoryError> {
        let earliest = self.earliest_version();
        let latest = self.current_version();
        if version < earliest || version > latest {
            return Err(HistoryError::UnknownRevision {
                filename: self.entry.filename.clone(),
                requested: version,
                earliest,
                latest,
            });
        }
        self.ledger.content_at(version).map_err(|source| {
            HistoryError::Ledger(LedgerError::Replay {
                base_uuid: self.entry.base_uuid.clone(),
                source,
            })
        })
    }

    /// Content of the oldest recorded revision
    pub fn first_revision(&self) -> Result<String, HistoryError> {
        self.ledger.first_revision().map_err(|source| {
            HistoryError::Ledger(LedgerError::Replay {
                base_uuid: self.entry.base_uuid.clone(),
                source,
            })
        })
    }

    /// Live content of the file on disk
    pub fn read_current(&self) -> Result<String, HistoryError> {
        fs::read_to_string(&self.path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => HistoryError::MissingFile(self.path.clone()),
            _ => HistoryError::Io {
                path: self.path.clone(),
                source,
            },
        })
    }

    /// Per-revision summaries, starting with the initial revision
    ///
    /// The initial revision has no ops, so it is reported with zero counts.
    pub fn revisions(&self) -> Vec<RevisionSummary> {
        let recorded = self.ledger.revisions();
        let first = recorded
            .first()
            .map(|r| r.version.saturating_sub(1))
            .unwrap_or(self.current_version());

        let mut all = Vec::with_capacity(recorded.len() + 1);
        if first >= 1 {
            all.push(RevisionSummary {
                version: first,
                inserts: 0,
                deletes: 0,
                modifies: 0,
                lines_added: 0,
                lines_removed: 0,
            });
        }
        all.extend(recorded);
        all
    }
}
