//! Per-file ledger document

use cedge_core::{content_at, reconstruct, DiffKind, DiffOp, ReconstructError};
use serde::{Deserialize, Serialize};

/// Latest snapshot of a tracked file plus its diff history, oldest first
///
/// Serialized as:
/// ```json
/// { "last_content": "...", "diffs": [ { "type": "m", "version": 2, ... } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ledger {
    /// File content as of the most recent recorded revision
    pub last_content: String,
    /// Every op ever recorded, ordered by non-decreasing revision
    pub diffs: Vec<DiffOp>,
}

/// Op counts recorded for one revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionSummary {
    pub version: u64,
    pub inserts: usize,
    pub deletes: usize,
    pub modifies: usize,
    pub lines_added: usize,
    pub lines_removed: usize,
}

impl Ledger {
    /// Ledger with a snapshot and no history
    pub fn new(snapshot: impl Into<String>) -> Self {
        Self {
            last_content: snapshot.into(),
            diffs: Vec::new(),
        }
    }

    /// Parse and validate a persisted ledger
    pub fn from_slice(bytes: &[u8]) -> Result<Self, String> {
        let ledger: Ledger = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        ledger.validate()?;
        Ok(ledger)
    }

    /// Encode as pretty-printed JSON
    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    /// Check every op and the revision ordering
    pub fn validate(&self) -> Result<(), String> {
        let mut previous = 0u64;
        for (i, op) in self.diffs.iter().enumerate() {
            op.validate().map_err(|e| format!("diff #{}: {}", i, e))?;
            if op.version < previous {
                return Err(format!(
                    "diff #{} has revision {} after revision {}",
                    i, op.version, previous
                ));
            }
            previous = op.version;
        }
        Ok(())
    }

    /// Revision of the newest recorded op
    pub fn latest_version(&self) -> Option<u64> {
        self.diffs.last().map(|op| op.version)
    }

    /// Content before any recorded op (revision 1 for a full history)
    pub fn first_revision(&self) -> Result<String, ReconstructError> {
        reconstruct(&self.last_content, &self.diffs)
    }

    /// Content as of `version`
    pub fn content_at(&self, version: u64) -> Result<String, ReconstructError> {
        content_at(&self.last_content, &self.diffs, version)
    }

    /// One summary per recorded revision, oldest first
    pub fn revisions(&self) -> Vec<RevisionSummary> {
        self.diffs
            .chunk_by(|a, b| a.version == b.version)
            .map(|batch| {
                let mut summary = RevisionSummary {
                    version: batch[0].version,
                    inserts: 0,
                    deletes: 0,
                    modifies: 0,
                    lines_added: 0,
                    lines_removed: 0,
                };
                for op in batch {
                    match op.kind {
                        DiffKind::Insert => summary.inserts += 1,
                        DiffKind::Delete => summary.deletes += 1,
                        DiffKind::Modify => summary.modifies += 1,
                    }
                    summary.lines_added += op.inserted;
                    summary.lines_removed += op.removed.len();
                }
                summary
            })
            .collect()
    }
}
