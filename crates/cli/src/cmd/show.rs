//! Print the content of a recorded revision

use crate::util;
use anyhow::{Context, Result};
use cedge_scanner::{Config, History};
use std::io::Write;
use std::path::Path;

pub fn run(root: &Path, file: &Path, version: Option<u64>) -> Result<()> {
    let config = Config::load(root).context("Failed to load configuration")?;
    let rel = util::relative_target(&config, file)?;
    let history = History::open(&config, &rel)?;

    let version = version.unwrap_or(history.current_version());
    let content = history.content_at(version)?;

    // Exact bytes, no added newline
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Failed to write to stdout")?;
    Ok(())
}
