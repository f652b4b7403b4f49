//! Tracing setup: stderr plus `.cedge/logs/cedge.log`

use anyhow::{Context, Result};
use cedge_scanner::Config;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer, Registry};

const LOG_FILE: &str = "cedge.log";

/// Install the global subscriber
///
/// The file layer is only added when `.cedge/` already exists or `create` is
/// set. The returned guard flushes the file writer on drop and must be held
/// until the command finishes.
pub fn init(root: &Path, verbose: bool, create: bool) -> Result<Option<WorkerGuard>> {
    let (stderr_level, file_level) = if verbose {
        (LevelFilter::DEBUG, LevelFilter::DEBUG)
    } else {
        (LevelFilter::WARN, LevelFilter::INFO)
    };

    let config = Config::for_root(root);
    let (file_layer, guard) = if create || config.state_dir().is_dir() {
        let dir = config.log_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

        let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_filter(file_level);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let stderr_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_level);

    Registry::default()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
