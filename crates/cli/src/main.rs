//! Cedge CLI - cedge command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod diff_utils;
mod logging;
mod prompt;
mod util;

/// Cedge - line-level revision ledger for a tree of projects
#[derive(Parser)]
#[command(name = "cedge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize .cedge/ and track every file under PATH
    Register {
        /// Root directory (default: current directory)
        path: Option<PathBuf>,
    },
    /// Record new files and new revisions of tracked files
    Add {
        /// Root directory (default: current directory)
        path: Option<PathBuf>,
        /// Overwrite corrupt ledgers without asking
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show a unified diff between a recorded revision and the working copy
    Diff {
        /// File, folder or `.`
        target: PathBuf,
        /// Revision to compare against (default: 1)
        #[arg(long, default_value = "1")]
        from: u64,
        /// Number of context lines (default: 3)
        #[arg(short = 'U', long, default_value = "3")]
        context: usize,
    },
    /// List the revisions of a tracked file
    Log {
        file: PathBuf,
    },
    /// Print the content of a revision
    Show {
        file: PathBuf,
        /// Revision to print (default: latest)
        #[arg(long)]
        version: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (root, create_state) = match &cli.command {
        Commands::Register { path } => (util::root_arg(path.as_deref())?, true),
        Commands::Add { path, .. } => (util::root_arg(path.as_deref())?, false),
        _ => (util::find_root()?, false),
    };
    let _guard = logging::init(&root, cli.verbose, create_state)?;

    match cli.command {
        Commands::Register { .. } => cmd::register::run(&root),
        Commands::Add { yes, .. } => cmd::add::run(&root, yes),
        Commands::Diff { target, from, context } => cmd::diff::run(&root, &target, from, context),
        Commands::Log { file } => cmd::log::run(&root, &file),
        Commands::Show { file, version } => cmd::show::run(&root, &file, version),
    }
}
