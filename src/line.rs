use crate::context::context_of;

/// A single line of one document version, with its surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInfo {
    line_number: usize,
    content: String,
    context: String,
}

impl LineInfo {
    /// Capture line `line_number` of `lines`, computing its context once.
    pub fn new(line_number: usize, lines: &[String], context_size: usize) -> Self {
        Self {
            line_number,
            content: lines[line_number].clone(),
            context: context_of(lines, line_number, context_size),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(line_number: usize, content: &str, context: &str) -> Self {
        Self {
            line_number,
            content: content.to_string(),
            context: context.to_string(),
        }
    }

    /// 0-based line number within its document
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Normalized line text, including the trailing `\n`
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Concatenated significant neighbour lines
    pub fn context(&self) -> &str {
        &self.context
    }
}

/// Correspondence between a left line and a right line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePair {
    pub left: LineInfo,
    pub right: LineInfo,
}

impl LinePair {
    pub fn new(left: LineInfo, right: LineInfo) -> Self {
        Self { left, right }
    }

    /// 0-based `(left, right)` line numbers
    pub fn line_numbers(&self) -> (usize, usize) {
        (self.left.line_number, self.right.line_number)
    }
}

/// One slot per left line; `None` marks a deleted line.
pub type MatchResult = Vec<Option<LinePair>>;
