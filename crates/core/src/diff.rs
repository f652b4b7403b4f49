//! Line differ producing reversible edit operations
//!
//! Texts are split on `\n` only. The empty text has zero lines and a trailing
//! newline produces a final empty line, so [`join_lines`] is the exact inverse
//! of [`split_lines`] and no whitespace is ever normalised away.
//!
//! Alignment comes from `similar` (Myers, with delete+insert runs grouped into
//! replacements). Each non-equal run becomes exactly one [`DiffOp`]:
//!
//! | run                    | op                                               |
//! |------------------------|--------------------------------------------------|
//! | insert `[j1,j2)` at i1 | `Insert { start: i1+1, end: i1+(j2-j1) }`        |
//! | delete `[i1,i2)`       | `Delete { start: i1+1, end: i2, removed }`       |
//! | replace `[i1,i2)`      | `Modify { start: i1+1, end: i2, removed }`       |

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffTag};
use std::fmt;
use thiserror::Error;

/// Kind of line edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffKind {
    /// Lines added
    #[serde(rename = "+")]
    Insert,
    /// Lines removed
    #[serde(rename = "-")]
    Delete,
    /// Lines replaced by a different run
    #[serde(rename = "m")]
    Modify,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiffKind::Insert => "insert",
            DiffKind::Delete => "delete",
            DiffKind::Modify => "modify",
        };
        f.write_str(name)
    }
}

/// One line-range edit recorded under a revision
///
/// `start`/`end` are 1-based and inclusive. For Delete and Modify they cover
/// the removed run in the pre-edit text and `removed` holds those lines
/// verbatim. `inserted` is the number of lines the edit occupies in the
/// post-edit text (0 for Delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffOp {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    /// Revision this op produced
    pub version: u64,
    #[serde(rename = "start_l")]
    pub start: usize,
    #[serde(rename = "end_l")]
    pub end: usize,
    #[serde(rename = "old_l")]
    pub removed: Vec<String>,
    #[serde(rename = "new_n")]
    pub inserted: usize,
}

/// A diff op whose fields contradict each other
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} op (revision {version}, lines {start}-{end}): {reason}")]
pub struct InvalidDiffOp {
    pub kind: DiffKind,
    pub version: u64,
    pub start: usize,
    pub end: usize,
    pub reason: &'static str,
}

impl DiffOp {
    /// `count` lines inserted before pre-edit index `at` (0-based)
    pub fn insert(version: u64, at: usize, count: usize) -> Self {
        Self {
            kind: DiffKind::Insert,
            version,
            start: at + 1,
            end: at + count,
            removed: Vec::new(),
            inserted: count,
        }
    }

    /// `removed` lines deleted starting at pre-edit index `at`
    pub fn delete(version: u64, at: usize, removed: Vec<String>) -> Self {
        Self {
            kind: DiffKind::Delete,
            version,
            start: at + 1,
            end: at + removed.len(),
            removed,
            inserted: 0,
        }
    }

    /// `removed` lines at pre-edit index `at` replaced by `count` new lines
    pub fn modify(version: u64, at: usize, removed: Vec<String>, count: usize) -> Self {
        Self {
            kind: DiffKind::Modify,
            version,
            start: at + 1,
            end: at + removed.len(),
            removed,
            inserted: count,
        }
    }

    /// Net change in line count caused by this op
    pub fn line_delta(&self) -> isize {
        self.inserted as isize - self.removed.len() as isize
    }

    /// Check that the recorded range, payload and counts agree
    pub fn validate(&self) -> Result<(), InvalidDiffOp> {
        let fail = |reason| InvalidDiffOp {
            kind: self.kind,
            version: self.version,
            start: self.start,
            end: self.end,
            reason,
        };

        if self.start == 0 {
            return Err(fail("line numbers are 1-based"));
        }

        match self.kind {
            DiffKind::Insert => {
                if !self.removed.is_empty() {
                    return Err(fail("insert carries removed lines"));
                }
                if self.inserted == 0 || self.end + 1 != self.start + self.inserted {
                    return Err(fail("insert range does not match inserted count"));
                }
            }
            DiffKind::Delete | DiffKind::Modify => {
                if self.removed.is_empty() || self.end + 1 != self.start + self.removed.len() {
                    return Err(fail("range does not match removed lines"));
                }
                if self.kind == DiffKind::Delete && self.inserted != 0 {
                    return Err(fail("delete inserts lines"));
                }
                if self.kind == DiffKind::Modify && self.inserted == 0 {
                    return Err(fail("modify has no replacement lines"));
                }
            }
        }

        Ok(())
    }
}

/// Split text into lines; `""` has no lines
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// Inverse of [`split_lines`]
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 1).sum());
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

/// Compute the ops turning `old_text` into `new_text`, tagged with `version`
pub fn compute_diffs(old_text: &str, new_text: &str, version: u64) -> Vec<DiffOp> {
    let old_lines = split_lines(old_text);
    let new_lines = split_lines(new_text);
    let owned = |range: std::ops::Range<usize>| -> Vec<String> {
        old_lines[range].iter().map(|l| (*l).to_string()).collect()
    };

    // Anchor each run on the end of the previous one; an Insert's own old
    // index can point before a preceding Equal run.
    let mut cursor = 0;
    let mut ops = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines) {
        let (tag, old, new) = op.as_tag_tuple();
        let at = cursor;
        cursor += old.len();
        match tag {
            DiffTag::Equal => {}
            DiffTag::Insert => ops.push(DiffOp::insert(version, at, new.len())),
            DiffTag::Delete => ops.push(DiffOp::delete(version, at, owned(at..cursor))),
            DiffTag::Replace => {
                ops.push(DiffOp::modify(version, at, owned(at..cursor), new.len()))
            }
        }
    }
    ops
}
