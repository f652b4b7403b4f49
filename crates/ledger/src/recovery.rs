//! Decision point for corrupt ledgers
//!
//! A corrupt ledger is never discarded silently. The store hands the
//! corruption details to a [`CorruptionResolver`] supplied by the caller, and
//! only an explicit [`Resolution::Overwrite`] lets it replace the document
//! with the fallback content (the live file).

use std::path::Path;

/// Caller decision for a corrupt ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Replace the ledger with the fallback content and an empty history
    Overwrite,
    /// Leave the ledger untouched and fail the operation
    Abort,
}

/// Details handed to the resolver
#[derive(Debug, Clone, Copy)]
pub struct CorruptLedger<'a> {
    pub base_uuid: &'a str,
    pub path: &'a Path,
    /// Parse or validation error
    pub reason: &'a str,
    /// Content that would become the new snapshot on overwrite
    pub fallback: &'a str,
}

/// Decides what to do with a corrupt ledger
pub trait CorruptionResolver {
    fn resolve(&self, corrupt: &CorruptLedger<'_>) -> Resolution;
}

impl<F> CorruptionResolver for F
where
    F: Fn(&CorruptLedger<'_>) -> Resolution,
{
    fn resolve(&self, corrupt: &CorruptLedger<'_>) -> Resolution {
        self(corrupt)
    }
}

/// Fallback content and resolver for one store call
#[derive(Clone, Copy)]
pub struct Recovery<'a> {
    pub fallback: &'a str,
    pub resolver: &'a dyn CorruptionResolver,
}

impl<'a> Recovery<'a> {
    pub fn new(fallback: &'a str, resolver: &'a dyn CorruptionResolver) -> Self {
        Self { fallback, resolver }
    }
}
