//! On-disk ledger store
//!
//! One JSON document per tracked file:
//! ```text
//! .cedge/diff/
//!   <base_uuid>.json
//! ```
//! Every write goes through [`atomic_write`], so a call either replaces the
//! whole document or leaves the previous one in place.

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::recovery::{CorruptLedger, Recovery, Resolution};
use cedge_core::DiffOp;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Store for per-file ledgers
pub struct LedgerStore {
    /// Directory holding `<base_uuid>.json` documents
    dir: PathBuf,
    /// Documents written through this handle
    writes: AtomicUsize,
}

impl LedgerStore {
    /// Store rooted at `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writes: AtomicUsize::new(0),
        }
    }

    /// Path of the document for `base_uuid`
    pub fn ledger_path(&self, base_uuid: &str) -> PathBuf {
        self.dir.join(format!("{}.json", base_uuid))
    }

    /// Whether a document exists for `base_uuid`
    pub fn exists(&self, base_uuid: &str) -> bool {
        self.ledger_path(base_uuid).is_file()
    }

    /// Number of documents written through this handle
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Load a ledger; an absent document is an empty ledger
    pub fn load(&self, base_uuid: &str) -> Result<Ledger, LedgerError> {
        let path = self.ledger_path(base_uuid);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Ledger::default()),
            Err(source) => return Err(LedgerError::Io { path, source }),
        };

        Ledger::from_slice(&bytes).map_err(|reason| LedgerError::Corrupt {
            base_uuid: base_uuid.to_string(),
            path,
            reason,
        })
    }

    /// Load a ledger, asking the resolver what to do if it is corrupt
    ///
    /// On overwrite the repaired ledger (fallback snapshot, no history) is
    /// persisted before it is returned.
    pub fn load_or_recover(
        &self,
        base_uuid: &str,
        recovery: &Recovery<'_>,
    ) -> Result<Ledger, LedgerError> {
        match self.load(base_uuid) {
            Err(LedgerError::Corrupt { path, reason, .. }) => {
                let repaired = self.resolve(base_uuid, &path, &reason, recovery)?;
                self.write(base_uuid, &repaired)?;
                Ok(repaired)
            }
            other => other,
        }
    }

    /// Merge new ops and snapshot into the persisted ledger
    ///
    /// `new_diffs` are appended after the existing history. `snapshot`
    /// replaces `last_content` when given; otherwise the stored snapshot is
    /// kept. Nothing is written if the resolver aborts or the merged ledger
    /// would be invalid.
    pub fn save(
        &self,
        base_uuid: &str,
        new_diffs: Vec<DiffOp>,
        snapshot: Option<String>,
        recovery: &Recovery<'_>,
    ) -> Result<Ledger, LedgerError> {
        let mut ledger = match self.load(base_uuid) {
            Ok(ledger) => ledger,
            Err(LedgerError::Corrupt { path, reason, .. }) => {
                self.resolve(base_uuid, &path, &reason, recovery)?
            }
            Err(e) => return Err(e),
        };

        let appended = new_diffs.len();
        ledger.diffs.extend(new_diffs);
        if let Some(snapshot) = snapshot {
            ledger.last_content = snapshot;
        }

        ledger.validate().map_err(|reason| LedgerError::Rejected {
            base_uuid: base_uuid.to_string(),
            reason,
        })?;

        self.write(base_uuid, &ledger)?;
        debug!(base_uuid, appended, total = ledger.diffs.len(), "ledger saved");
        Ok(ledger)
    }

    /// Ask the resolver about a corrupt ledger; returns the repaired ledger
    fn resolve(
        &self,
        base_uuid: &str,
        path: &Path,
        reason: &str,
        recovery: &Recovery<'_>,
    ) -> Result<Ledger, LedgerError> {
        warn!(base_uuid, path = %path.display(), reason, "corrupt ledger found");

        let corrupt = CorruptLedger {
            base_uuid,
            path,
            reason,
            fallback: recovery.fallback,
        };

        match recovery.resolver.resolve(&corrupt) {
            Resolution::Overwrite => {
                info!(base_uuid, "overwriting corrupt ledger with live file content");
                Ok(Ledger::new(recovery.fallback))
            }
            Resolution::Abort => {
                warn!(base_uuid, "overwrite declined, ledger left untouched");
                Err(LedgerError::Aborted {
                    base_uuid: base_uuid.to_string(),
                })
            }
        }
    }

    fn write(&self, base_uuid: &str, ledger: &Ledger) -> Result<(), LedgerError> {
        let path = self.ledger_path(base_uuid);
        let bytes = ledger.to_vec()?;
        atomic_write(&path, &bytes).map_err(|source| LedgerError::Io { path, source })?;
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Atomic write helper
///
/// Writes data to a temporary file next to the target, fsyncs it, then
/// renames it over the target.
pub fn atomic_write(target: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
