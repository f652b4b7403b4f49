//! CLI command implementations

pub mod add;
pub mod diff;
pub mod log;
pub mod register;
pub mod show;

use cedge_scanner::ScanReport;
use owo_colors::OwoColorize;

/// Print the per-file lines of a scan report
pub(crate) fn print_report(report: &ScanReport) {
    for filename in &report.added {
        println!("  {} {}", "+".green(), filename);
    }
    for (filename, version) in &report.advanced {
        println!("  {} {} {}", "~".yellow(), filename, format!("v{}", version).cyan());
    }
    for skipped in &report.skipped {
        println!(
            "  {} {} {}",
            "!".red(),
            skipped.filename,
            format!("({})", skipped.reason).dimmed()
        );
    }
    for conflict in &report.conflicts {
        println!(
            "  {} {} {}",
            "?".yellow(),
            conflict.filename,
            format!("({})", conflict.error).dimmed()
        );
    }
}
