//! List the revisions of a tracked file

use crate::util;
use anyhow::{Context, Result};
use cedge_scanner::{Config, History};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(root: &Path, file: &Path) -> Result<()> {
    let config = Config::load(root).context("Failed to load configuration")?;
    let rel = util::relative_target(&config, file)?;
    let history = History::open(&config, &rel)?;
    let entry = &history.entry;

    println!("{} {}", "file".yellow().bold(), entry.filename.cyan());
    println!("{} {}", "Project:   ".dimmed(), entry.project);
    println!("{} {}", "Identifier:".dimmed(), entry.full_uuid);
    println!(
        "{} {} ({})",
        "Recorded:  ".dimmed(),
        util::format_absolute_time(entry.mtime),
        util::format_relative_time(entry.mtime).dimmed()
    );
    println!();

    for revision in history.revisions().iter().rev() {
        let marker = if revision.version == history.current_version() {
            " (current)".green().to_string()
        } else {
            String::new()
        };

        let total_ops = revision.inserts + revision.deletes + revision.modifies;
        if total_ops == 0 {
            println!("  {}{}  {}", format!("v{}", revision.version).cyan(), marker, "initial snapshot".dimmed());
            continue;
        }

        println!(
            "  {}{}  {} {}  {}",
            format!("v{}", revision.version).cyan(),
            marker,
            format!("+{}", revision.lines_added).green(),
            format!("-{}", revision.lines_removed).red(),
            format!(
                "({} insert, {} delete, {} modify)",
                revision.inserts, revision.deletes, revision.modifies
            )
            .dimmed()
        );
    }

    Ok(())
}
