//! Whitespace normalization applied to both documents before diffing.
//!
//! Every line of the input is reduced to a canonical form so that purely
//! cosmetic edits (re-indentation, aligned assignments, tabs vs spaces) do
//! not show up as changes in the structural diff.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::unwrap_used)]
static HORIZONTAL_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[ \t]+").unwrap());

/// Normalize a single line: collapse runs of spaces/tabs, trim, and
/// terminate with exactly one `\n`.
pub fn normalize_line(line: &str) -> String {
    let mut normalized = HORIZONTAL_WHITESPACE
        .replace_all(line, " ")
        .trim()
        .to_string();
    normalized.push('\n');
    normalized
}

/// Split `text` into normalized lines.
///
/// Both `\n` and `\r\n` terminate a line. A trailing terminator does not
/// produce an extra empty line, and empty input yields no lines at all.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines().map(normalize_line).collect()
}
