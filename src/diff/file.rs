use super::DiffError;
use super::hunk::{Hunk, HunkLine};

/// A unified diff between two versions of one document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileDiff {
    /// Hunks in document order
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Parse unified diff text.
    ///
    /// Everything before the first `@@` header is file header and skipped.
    /// After the first header every line must be either another hunk header
    /// or a tagged body line, and each hunk body must match the line counts
    /// declared in its header.
    ///
    /// Empty input parses to a diff without hunks.
    pub fn parse(text: &str) -> Result<Self, DiffError> {
        let mut diff = FileDiff::default();
        let mut current: Option<Hunk> = None;

        for line in text.lines() {
            if line.starts_with("@@") {
                if let Some(hunk) = current.take() {
                    hunk.validate()?;
                    diff.hunks.push(hunk);
                }
                current = Some(Hunk::parse_header(line)?);
                continue;
            }

            if let Some(hunk) = current.as_mut() {
                if let Some(body_line) = HunkLine::parse(line)? {
                    hunk.lines.push(body_line);
                }
            }
        }

        if let Some(hunk) = current {
            hunk.validate()?;
            diff.hunks.push(hunk);
        }

        Ok(diff)
    }

    /// Whether the diff reports any change at all
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }
}
