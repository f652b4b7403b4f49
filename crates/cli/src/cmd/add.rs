//! Record new files and new revisions

use crate::cmd::print_report;
use crate::prompt::PromptResolver;
use anyhow::{Context, Result};
use cedge_scanner::{Config, Scanner};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(root: &Path, yes: bool) -> Result<()> {
    let config = Config::load(root).context("Failed to load configuration")?;
    let resolver = PromptResolver::new(yes);

    let report = Scanner::new(&config, &resolver)
        .context("Failed to prepare scanner")?
        .scan()?;

    if !report.changed() && report.skipped.is_empty() {
        println!("{}", "Nothing changed".dimmed());
        return Ok(());
    }

    print_report(&report);
    println!();
    println!(
        "{} new, {} updated, {} unchanged, {} skipped",
        report.added.len(),
        report.advanced.len(),
        report.unchanged + report.refreshed.len(),
        report.skipped.len()
    );
    Ok(())
}
