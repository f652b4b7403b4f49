//! Utilities for generating line-by-line diffs

use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};

/// Generate a unified diff with colored output
///
/// Returns an empty string when the texts are equal. Otherwise the output
/// starts with `---`/`+++` headers followed by the hunks.
pub fn generate_unified_diff(
    old_text: &str,
    new_text: &str,
    old_label: &str,
    new_label: &str,
    context_lines: usize,
) -> String {
    if old_text == new_text {
        return String::new();
    }

    let diff = TextDiff::from_lines(old_text, new_text);

    let mut output = String::new();
    output.push_str(&format!("{}\n", format!("--- {}", old_label).bold()));
    output.push_str(&format!("{}\n", format!("+++ {}", new_label).bold()));

    for hunk in diff.unified_diff().context_radius(context_lines).iter_hunks() {
        // Hunk header (e.g., @@ -12,7 +12,8 @@)
        let header = format!("{}", hunk.header());
        output.push_str(&format!("{}\n", header.cyan()));

        for change in hunk.iter_changes() {
            let line: &str = change.value();

            match change.tag() {
                ChangeTag::Delete => output.push_str(&format!("{}", format!("-{}", line).red())),
                ChangeTag::Insert => output.push_str(&format!("{}", format!("+{}", line).green())),
                ChangeTag::Equal => output.push_str(&format!("{}", format!(" {}", line).dimmed())),
            }

            if change.missing_newline() {
                output.push_str("\n\\ No newline at end of file");
            }
            if !line.ends_with('\n') {
                output.push('\n');
            }
        }
    }

    output
}
