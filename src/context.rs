//! Extraction of the significant lines surrounding a given line.

use regex::Regex;
use std::sync::LazyLock;

/// Lines made of a single bracket or parenthesis carry no context.
#[allow(clippy::unwrap_used)]
static BRACKET_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[{()}]$").unwrap());

/// Whether a line contributes to the context of its neighbours.
///
/// Blank lines and lines consisting solely of `{`, `(`, `}` or `)` (after
/// trimming) are insignificant.
pub fn is_significant(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !BRACKET_ONLY.is_match(trimmed)
}

/// Build the context string for `lines[line_number]`.
///
/// Collects up to `context_size` significant lines above and up to
/// `context_size` significant lines below, skipping insignificant ones, and
/// concatenates them in document order. The line itself is not included.
/// Returns an empty string when `line_number` has no significant neighbours.
pub fn context_of(lines: &[String], line_number: usize, context_size: usize) -> String {
    let above: Vec<&str> = lines[..line_number.min(lines.len())]
        .iter()
        .rev()
        .map(String::as_str)
        .filter(|line| is_significant(line))
        .take(context_size)
        .collect();

    let below = lines
        .iter()
        .skip(line_number + 1)
        .map(String::as_str)
        .filter(|line| is_significant(line))
        .take(context_size);

    let mut context = String::new();
    for line in above.iter().rev() {
        context.push_str(line);
    }
    for line in below {
        context.push_str(line);
    }
    context
}
