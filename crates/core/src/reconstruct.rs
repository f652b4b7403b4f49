//! Reverse application of diff history
//!
//! Ops are grouped into batches (contiguous runs sharing a revision). Each
//! batch was computed against the snapshot that existed at the time, so
//! batches are undone newest first as whole blocks. Inside a batch the ops
//! are undone last to first; an op's position in the working buffer is its
//! pre-edit start shifted by the net line change of the earlier ops in the
//! same batch.

use crate::diff::{join_lines, split_lines, DiffKind, DiffOp};
use thiserror::Error;

/// Failure while reversing a diff history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructError {
    /// An op addresses lines beyond the working buffer
    #[error("{kind} op of revision {version} spans lines {start}..{end} but only {available} lines exist")]
    OutOfRange {
        kind: DiffKind,
        version: u64,
        start: usize,
        end: usize,
        available: usize,
    },
}

/// Content as it was before the first op in `diffs` was applied
pub fn reconstruct(last_content: &str, diffs: &[DiffOp]) -> Result<String, ReconstructError> {
    let mut lines: Vec<String> = split_lines(last_content)
        .into_iter()
        .map(str::to_owned)
        .collect();

    for batch in diffs.chunk_by(|a, b| a.version == b.version).rev() {
        undo_batch(&mut lines, batch)?;
    }

    Ok(join_lines(&lines))
}

/// Content as of revision `version`, undoing every op recorded after it
///
/// `diffs` must be ordered oldest first, as stored in a ledger.
pub fn content_at(
    last_content: &str,
    diffs: &[DiffOp],
    version: u64,
) -> Result<String, ReconstructError> {
    let first_newer = diffs.partition_point(|op| op.version <= version);
    reconstruct(last_content, &diffs[first_newer..])
}

fn undo_batch(lines: &mut Vec<String>, batch: &[DiffOp]) -> Result<(), ReconstructError> {
    // Post-edit start of each op: pre-edit start plus the shift of earlier ops
    let mut shift: isize = 0;
    let mut positions = Vec::with_capacity(batch.len());
    for op in batch {
        let at = op.start as isize - 1 + shift;
        if at < 0 {
            return Err(ReconstructError::OutOfRange {
                kind: op.kind,
                version: op.version,
                start: op.start,
                end: op.end,
                available: lines.len(),
            });
        }
        positions.push(at as usize);
        shift += op.line_delta();
    }

    for (op, &at) in batch.iter().zip(&positions).rev() {
        let span_end = at + op.inserted;
        if span_end > lines.len() {
            return Err(ReconstructError::OutOfRange {
                kind: op.kind,
                version: op.version,
                start: at + 1,
                end: span_end,
                available: lines.len(),
            });
        }

        match op.kind {
            DiffKind::Insert => {
                lines.drain(at..span_end);
            }
            DiffKind::Delete | DiffKind::Modify => {
                lines.splice(at..span_end, op.removed.iter().cloned());
            }
        }
    }

    Ok(())
}
