//! Interactive confirmation for corrupt ledgers

use cedge_ledger::{CorruptLedger, CorruptionResolver, Resolution};
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

/// Asks on stderr/stdin before a corrupt ledger is overwritten
///
/// End of input counts as "no", so non-interactive runs never overwrite
/// unless `assume_yes` is set.
pub struct PromptResolver {
    pub assume_yes: bool,
}

impl PromptResolver {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl CorruptionResolver for PromptResolver {
    fn resolve(&self, corrupt: &CorruptLedger<'_>) -> Resolution {
        eprintln!(
            "{} ledger {} is corrupt: {}",
            "warning:".yellow().bold(),
            corrupt.path.display(),
            corrupt.reason
        );

        if self.assume_yes {
            eprintln!("  overwriting with the current file content (--yes)");
            return Resolution::Overwrite;
        }

        eprint!("  Overwrite it with the current file content? History will be lost. [y/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => parse_answer(&answer),
            Err(_) => Resolution::Abort,
        }
    }
}

fn parse_answer(answer: &str) -> Resolution {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Resolution::Overwrite,
        _ => Resolution::Abort,
    }
}
