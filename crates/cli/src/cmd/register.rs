//! Initialize .cedge/ under a root and track every file

use crate::cmd::print_report;
use crate::prompt::PromptResolver;
use anyhow::{Context, Result};
use cedge_scanner::{Config, Scanner};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(root: &Path) -> Result<()> {
    let config = Config::load(root).context("Failed to load configuration")?;
    let resolver = PromptResolver::new(false);

    let report = Scanner::new(&config, &resolver)
        .context("Failed to prepare scanner")?
        .register()?;

    println!("Registered {}", config.root.display().to_string().cyan());
    print_report(&report);
    println!();
    println!(
        "Tracking {} files ({} skipped)",
        report.added.len().to_string().bold(),
        report.skipped.len()
    );
    println!("Run 'cedge add' after editing to record new revisions");
    Ok(())
}
