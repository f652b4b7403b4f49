//! Show diffs between a recorded revision and the working copy

use crate::diff_utils;
use crate::util;
use anyhow::{Context, Result};
use cedge_ledger::Registry;
use cedge_scanner::{Config, History, HistoryError};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(root: &Path, target: &Path, from: u64, context: usize) -> Result<()> {
    let config = Config::load(root).context("Failed to load configuration")?;
    let registry = Registry::load(&config.registry_path)?;
    let rel = util::relative_target(&config, target)?;

    // Single tracked file: every failure is an error
    if registry.find_by_filename(&rel).is_some() {
        let history = History::from_registry(&config, &registry, &rel)?;
        let current = history.read_current()?;
        let old = history.content_at(from)?;
        if !print_file_diff(&rel, from, &old, &current, context) {
            println!("{}", format!("{}: no changes since v{}", rel, from).dimmed());
        }
        return Ok(());
    }

    let entries: Vec<_> = registry.under(&rel).collect();
    if entries.is_empty() {
        let path = config.root.join(&rel);
        if path.is_file() {
            anyhow::bail!("{} is not tracked", rel);
        } else if !path.exists() {
            anyhow::bail!("File does not exist: {}", target.display());
        }
        anyhow::bail!("No tracked files under {}", target.display());
    }

    // Folder: report per-file problems and keep going
    let total = entries.len();
    let mut changed = 0;
    for entry in entries {
        let filename = &entry.filename;
        let texts = History::from_registry(&config, &registry, filename).and_then(|history| {
            let current = history.read_current()?;
            let old = history.content_at(from)?;
            Ok((old, current))
        });

        match texts {
            Ok((old, current)) => {
                if print_file_diff(filename, from, &old, &current, context) {
                    changed += 1;
                }
            }
            Err(HistoryError::MissingFile(_)) => {
                println!("{} {}", "deleted:".red(), filename);
                changed += 1;
            }
            Err(HistoryError::UnknownRevision { .. }) => {
                tracing::debug!(file = %filename, from, "revision not recorded, skipping");
            }
            Err(e) => {
                eprintln!("{} {}: {}", "warning:".yellow().bold(), filename, e);
            }
        }
    }

    println!();
    println!("{} of {} tracked files differ from v{}", changed, total, from);
    Ok(())
}

/// Print one file's diff; returns false when the texts are equal
fn print_file_diff(filename: &str, from: u64, old: &str, current: &str, context: usize) -> bool {
    let diff = diff_utils::generate_unified_diff(
        old,
        current,
        &format!("a/{}@v{}", filename, from),
        &format!("b/{}", filename),
        context,
    );
    if diff.is_empty() {
        return false;
    }

    println!("{} {}", "diff".bold(), filename.cyan());
    print!("{}", diff);
    true
}
