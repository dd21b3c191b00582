use super::DiffError;
use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::{char, not_line_ending, u32 as decimal},
    combinator::{all_consuming, opt},
    sequence::preceded,
};
use std::fmt;

/// Line range from a hunk header, as written (`start` is 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    pub start: u32,
    pub count: u32,
}

impl HunkRange {
    /// 0-based index of the first line covered by this range.
    ///
    /// An empty range is anchored *after* line `start`, so its first index is
    /// `start` itself.
    pub fn first_index(&self) -> usize {
        if self.count == 0 {
            self.start as usize
        } else {
            self.start.saturating_sub(1) as usize
        }
    }

    /// 0-based index one past the last line covered by this range.
    pub fn end_index(&self) -> usize {
        self.first_index() + self.count as usize
    }
}

impl fmt::Display for HunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.count {
            1 => write!(f, "{}", self.start),
            n => write!(f, "{},{}", self.start, n),
        }
    }
}

/// Tag of a line in a hunk body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkLine {
    /// Present in both versions
    Common,
    /// Only in the left (old) version
    Removed,
    /// Only in the right (new) version
    Added,
}

impl HunkLine {
    /// Classify a body line by its leading tag character.
    ///
    /// Returns `Ok(None)` for the `\ No newline at end of file` marker.
    pub fn parse(line: &str) -> Result<Option<Self>, DiffError> {
        match line.chars().next() {
            Some(' ') => Ok(Some(HunkLine::Common)),
            Some('-') => Ok(Some(HunkLine::Removed)),
            Some('+') => Ok(Some(HunkLine::Added)),
            Some('\\') => Ok(None),
            _ => Err(DiffError::UnexpectedLine {
                line: line.to_string(),
            }),
        }
    }
}

/// A single hunk of a unified diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old: HunkRange,
    pub new: HunkRange,
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Parse a hunk header, e.g. `@@ -3,7 +3,8 @@ fn main() {`.
    ///
    /// Returns a hunk with an empty body; omitted counts default to 1.
    pub fn parse_header(header: &str) -> Result<Self, DiffError> {
        let (_, (old, new)) =
            all_consuming(header_ranges)
                .parse(header)
                .map_err(|_| DiffError::InvalidHunkHeader {
                    line: header.to_string(),
                })?;

        Ok(Hunk {
            old,
            new,
            lines: Vec::new(),
        })
    }

    /// Check that the body agrees with the counts declared in the header.
    pub fn validate(&self) -> Result<(), DiffError> {
        let old_lines = self
            .lines
            .iter()
            .filter(|l| !matches!(l, HunkLine::Added))
            .count();
        let new_lines = self
            .lines
            .iter()
            .filter(|l| !matches!(l, HunkLine::Removed))
            .count();

        if old_lines != self.old.count as usize || new_lines != self.new.count as usize {
            return Err(DiffError::HunkLengthMismatch {
                header: format!("-{} +{}", self.old, self.new),
                old_lines,
                new_lines,
            });
        }
        Ok(())
    }
}

fn range(input: &str) -> IResult<&str, HunkRange> {
    (decimal, opt(preceded(char(','), decimal)))
        .map(|(start, count)| HunkRange {
            start,
            count: count.unwrap_or(1),
        })
        .parse(input)
}

fn header_ranges(input: &str) -> IResult<&str, (HunkRange, HunkRange)> {
    (
        preceded(tag("@@ -"), range),
        preceded(tag(" +"), range),
        tag(" @@"),
        not_line_ending,
    )
        .map(|(old, new, _, _)| (old, new))
        .parse(input)
}
