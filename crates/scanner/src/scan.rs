//! Registry scanner
//!
//! Walks every top-level, non-hidden project directory under the root,
//! compares file mtimes against the registry and records new revisions in
//! the ledger store. A file whose mtime has not moved forward is never read.

use crate::config::Config;
use crate::error::ScanError;
use crate::ignore::IgnoreRules;
use crate::registrar::{Registrar, Registration, RegistrationError};
use cedge_core::{compute_diffs, identity};
use cedge_ledger::{
    CorruptionResolver, LedgerError, LedgerStore, Recovery, Registry, RegistryEntry,
    RegistryError,
};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Bytes inspected for NUL when sniffing binary content
const BINARY_PROBE: usize = 8192;

/// Why a file was left out of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Vanished between listing and reading
    Missing,
    /// Binary or not UTF-8
    NotText,
    /// Corrupt ledger and the resolver declined the overwrite
    Declined,
    Ledger(String),
    Io(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "file disappeared"),
            SkipReason::NotText => write!(f, "not a UTF-8 text file"),
            SkipReason::Declined => write!(f, "corrupt ledger left untouched"),
            SkipReason::Ledger(msg) => write!(f, "ledger error: {}", msg),
            SkipReason::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub filename: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub filename: String,
    pub error: RegistrationError,
}

/// Outcome of one scan
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Newly tracked files
    pub added: Vec<String>,
    /// Files that got a new revision, with that revision
    pub advanced: Vec<(String, u64)>,
    /// Newer mtime but identical content; only the mtime moved
    pub refreshed: Vec<String>,
    /// Files whose mtime did not move forward
    pub unchanged: usize,
    pub skipped: Vec<Skipped>,
    /// Registrar rejections (non-fatal)
    pub conflicts: Vec<Conflict>,
    /// Ledger documents written during the scan
    pub ledger_writes: usize,
}

impl ScanReport {
    /// Whether the registry needs to be rewritten
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.advanced.is_empty() || !self.refreshed.is_empty()
    }

    fn skip(&mut self, filename: String, reason: SkipReason) {
        warn!(file = %filename, %reason, "skipping file");
        self.skipped.push(Skipped { filename, reason });
    }
}

/// A regular file found under a project directory
#[derive(Debug, Clone)]
struct DiscoveredFile {
    project: String,
    /// Root-relative, `/`-separated
    filename: String,
    path: PathBuf,
    mtime: f64,
}

enum Advance {
    Refreshed,
    Revised { ops: usize },
}

/// Scanner for one root
pub struct Scanner<'a> {
    config: &'a Config,
    store: LedgerStore,
    ignore: IgnoreRules,
    resolver: &'a dyn CorruptionResolver,
    registrar: Option<&'a dyn Registrar>,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a Config, resolver: &'a dyn CorruptionResolver) -> Result<Self, ScanError> {
        let ignore = IgnoreRules::load(&config.root, config.ignore.clone())?;
        debug!(sources = ignore.active_sources(), "ignore rules loaded");

        Ok(Self {
            config,
            store: LedgerStore::new(config.ledger_dir.clone()),
            ignore,
            resolver,
            registrar: None,
        })
    }

    /// Announce new revisions to `registrar`
    pub fn with_registrar(mut self, registrar: &'a dyn Registrar) -> Self {
        self.registrar = Some(registrar);
        self
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Create the registry and track every file at version 1
    pub fn register(&self) -> Result<ScanReport, ScanError> {
        let path = &self.config.registry_path;
        if path.exists() {
            return Err(RegistryError::AlreadyExists { path: path.clone() }.into());
        }

        let mut registry = Registry::new(self.config.host_node.clone());
        let report = self.scan_into(&mut registry)?;
        registry.save(path)?;

        info!(tracked = registry.files.len(), root = %self.config.root.display(), "root registered");
        Ok(report)
    }

    /// Record new files and new revisions of tracked files
    pub fn scan(&self) -> Result<ScanReport, ScanError> {
        let path = &self.config.registry_path;
        let mut registry = Registry::load(path)?;
        let report = self.scan_into(&mut registry)?;

        if report.changed() {
            registry.save(path)?;
        } else {
            debug!("nothing changed, registry left as is");
        }
        Ok(report)
    }

    fn scan_into(&self, registry: &mut Registry) -> Result<ScanReport, ScanError> {
        let writes_before = self.store.writes();
        let mut report = ScanReport::default();
        let files = self.discover(&mut report)?;

        let host_node = registry.host_node.clone();
        let mut index: HashMap<String, usize> = registry
            .files
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.base_uuid.clone(), i))
            .collect();

        for file in files {
            let base_uuid = identity::base_uuid(&file.project, &file.filename);

            match index.get(&base_uuid).copied() {
                None => match self.track_new(&base_uuid, &file) {
                    Ok(entry) => {
                        info!(file = %file.filename, version = entry.version, "tracking new file");
                        self.announce(&host_node, &entry, &mut report);
                        report.added.push(file.filename);
                        index.insert(base_uuid, registry.files.len());
                        registry.files.push(entry);
                    }
                    Err(reason) => report.skip(file.filename, reason),
                },
                Some(i) => {
                    let entry = &mut registry.files[i];
                    if file.mtime <= entry.mtime {
                        debug!(file = %file.filename, "mtime unchanged");
                        report.unchanged += 1;
                        continue;
                    }

                    match self.advance(entry, &file) {
                        Ok(Advance::Refreshed) => {
                            debug!(file = %file.filename, "content unchanged, mtime refreshed");
                            report.refreshed.push(file.filename);
                        }
                        Ok(Advance::Revised { ops }) => {
                            info!(file = %file.filename, version = entry.version, ops, "revision recorded");
                            self.announce(&host_node, entry, &mut report);
                            report.advanced.push((file.filename, entry.version));
                        }
                        Err(reason) => report.skip(file.filename, reason),
                    }
                }
            }
        }

        report.ledger_writes = self.store.writes() - writes_before;
        Ok(report)
    }

    fn track_new(&self, base_uuid: &str, file: &DiscoveredFile) -> Result<RegistryEntry, SkipReason> {
        let content = read_text(&file.path)?;
        let recovery = Recovery::new(&content, self.resolver);
        let mut entry = RegistryEntry::new(&file.project, &file.filename, file.mtime);

        if !self.store.exists(base_uuid) {
            self.store
                .save(base_uuid, Vec::new(), Some(content.clone()), &recovery)
                .map_err(skip_reason)?;
            return Ok(entry);
        }

        // Ledger left behind by an earlier registry: continue its history
        let ledger = self
            .store
            .load_or_recover(base_uuid, &recovery)
            .map_err(skip_reason)?;
        entry.version = ledger.latest_version().unwrap_or(1);

        if ledger.last_content != content {
            entry.version += 1;
            let diffs = compute_diffs(&ledger.last_content, &content, entry.version);
            self.store
                .save(base_uuid, diffs, Some(content.clone()), &recovery)
                .map_err(skip_reason)?;
        }

        debug!(file = %file.filename, version = entry.version, "adopted existing ledger");
        Ok(entry)
    }

    fn advance(&self, entry: &mut RegistryEntry, file: &DiscoveredFile) -> Result<Advance, SkipReason> {
        let content = read_text(&file.path)?;
        let recovery = Recovery::new(&content, self.resolver);

        if !self.store.exists(&entry.base_uuid) {
            warn!(file = %entry.filename, "ledger missing for tracked file, history restarts empty");
        }
        let ledger = self
            .store
            .load_or_recover(&entry.base_uuid, &recovery)
            .map_err(skip_reason)?;

        if ledger.last_content == content {
            entry.mtime = file.mtime;
            return Ok(Advance::Refreshed);
        }

        let version = entry.version + 1;
        let diffs = compute_diffs(&ledger.last_content, &content, version);
        let ops = diffs.len();
        self.store
            .save(&entry.base_uuid, diffs, Some(content.clone()), &recovery)
            .map_err(skip_reason)?;

        entry.advance(file.mtime);
        Ok(Advance::Revised { ops })
    }

    fn announce(&self, host_node: &str, entry: &RegistryEntry, report: &mut ScanReport) {
        let Some(registrar) = self.registrar else {
            return;
        };

        let registration = Registration {
            uuid: &entry.full_uuid,
            project: &entry.project,
            host_node,
            version: entry.version,
        };

        match registrar.register(&registration) {
            Ok(()) => debug!(uuid = %entry.full_uuid, "identifier registered"),
            Err(error) => {
                warn!(file = %entry.filename, %error, "registrar rejected identifier");
                report.conflicts.push(Conflict {
                    filename: entry.filename.clone(),
                    error,
                });
            }
        }
    }

    /// List candidate files, projects and paths in name order
    fn discover(&self, report: &mut ScanReport) -> Result<Vec<DiscoveredFile>, ScanError> {
        let root = &self.config.root;
        let io_err = |source: io::Error| ScanError::Io {
            path: root.clone(),
            source,
        };

        let mut projects = Vec::new();
        for entry in fs::read_dir(root).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            if !entry.file_type().map_err(io_err)?.is_dir() {
                continue;
            }

            let Ok(name) = entry.file_name().into_string() else {
                warn!(path = %entry.path().display(), "skipping project with non-UTF-8 name");
                continue;
            };
            if name.starts_with('.') || self.ignore.should_ignore(Path::new(&name), true) {
                debug!(project = %name, "project skipped");
                continue;
            }
            projects.push(name);
        }
        projects.sort();

        let mut files = Vec::new();
        for project in projects {
            let walker = WalkDir::new(root.join(&project))
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !self.is_ignored(e));

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        let filename = err
                            .path()
                            .and_then(|p| self.config.relative_name(p))
                            .unwrap_or_else(|| project.clone());
                        report.skip(filename, SkipReason::Io(err.to_string()));
                        continue;
                    }
                };

                if !entry.file_type().is_file() {
                    continue;
                }

                let Some(filename) = self.config.relative_name(entry.path()) else {
                    warn!(path = %entry.path().display(), "skipping non-UTF-8 path");
                    continue;
                };

                let modified = entry
                    .metadata()
                    .map_err(|e| e.to_string())
                    .and_then(|m| m.modified().map_err(|e| e.to_string()));
                match modified {
                    Ok(modified) => files.push(DiscoveredFile {
                        project: project.clone(),
                        filename,
                        path: entry.into_path(),
                        mtime: unix_secs(modified),
                    }),
                    Err(msg) => report.skip(filename, SkipReason::Io(msg)),
                }
            }
        }

        debug!(files = files.len(), "discovery finished");
        Ok(files)
    }

    fn is_ignored(&self, entry: &DirEntry) -> bool {
        match entry.path().strip_prefix(&self.config.root) {
            Ok(rel) => self.ignore.should_ignore(rel, entry.file_type().is_dir()),
            Err(_) => false,
        }
    }
}

fn unix_secs(time: SystemTime) -> f64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Read a file as UTF-8 text
fn read_text(path: &Path) -> Result<String, SkipReason> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SkipReason::Missing,
        _ => SkipReason::Io(e.to_string()),
    })?;

    if bytes[..bytes.len().min(BINARY_PROBE)].contains(&0) {
        return Err(SkipReason::NotText);
    }
    String::from_utf8(bytes).map_err(|_| SkipReason::NotText)
}

fn skip_reason(err: LedgerError) -> SkipReason {
    match err {
        LedgerError::Aborted { .. } => SkipReason::Declined,
        other => SkipReason::Ledger(other.to_string()),
    }
}
