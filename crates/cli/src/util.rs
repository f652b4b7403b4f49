//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use cedge_scanner::{Config, STATE_DIR};
use chrono::{Local, TimeZone};
use std::path::{Path, PathBuf};

/// Find the root by walking up from cwd to the nearest `.cedge/`
pub fn find_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let cwd = cwd
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", cwd.display()))?;
    find_root_from(&cwd)
}

pub fn find_root_from(start: &Path) -> Result<PathBuf> {
    let mut current = start;
    loop {
        if current.join(STATE_DIR).is_dir() {
            return Ok(current.to_path_buf());
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => anyhow::bail!("Not a cedge root (no {} directory found); run `cedge register` first", STATE_DIR),
        }
    }
}

/// Resolve an explicit root argument (default: cwd)
pub fn root_arg(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.unwrap_or_else(|| Path::new("."));
    let root = path
        .canonicalize()
        .with_context(|| format!("Directory does not exist: {}", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", path.display());
    }
    Ok(root)
}

/// Root-relative, `/`-separated name for a path given on the command line
///
/// The path need not exist as long as its parent does. The root itself maps
/// to the empty string.
pub fn relative_target(config: &Config, target: &Path) -> Result<String> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let absolute = cwd.join(target);

    let resolved = match absolute.canonicalize() {
        Ok(resolved) => resolved,
        Err(_) => {
            let name = absolute
                .file_name()
                .with_context(|| format!("Invalid path: {}", target.display()))?;
            let parent = absolute.parent().unwrap_or(&absolute);
            parent
                .canonicalize()
                .with_context(|| format!("File does not exist: {}", target.display()))?
                .join(name)
        }
    };

    config
        .relative_name(&resolved)
        .with_context(|| format!("{} is outside {}", target.display(), config.root.display()))
}

/// Format unix seconds as local time ("2024-01-03 14:30:00")
pub fn format_absolute_time(secs: f64) -> String {
    let millis = (secs * 1000.0) as i64;
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("{:.0}", secs),
    }
}

/// Format unix seconds as relative time ("2 hours ago")
pub fn format_relative_time(secs: f64) -> String {
    let now = Local::now().timestamp_millis() as f64 / 1000.0;
    if secs > now {
        return "in the future".to_string();
    }

    let seconds = (now - secs) as u64;
    if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds < 604800 {
        format!("{} days ago", seconds / 86400)
    } else {
        format!("{} weeks ago", seconds / 604800)
    }
}
