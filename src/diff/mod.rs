//! Structural line diff and its interpretation into line correspondences.
//!
//! A [`LineDiff`] engine renders a unified diff of the two normalized
//! documents. The text is parsed back into hunks by [`FileDiff::parse`] and
//! walked by [`align`], which pairs unchanged lines directly and collects the
//! removed and added lines left for similarity matching.

pub mod file;
pub mod hunk;

pub use file::FileDiff;
pub use hunk::{Hunk, HunkLine, HunkRange};

use crate::line::{LineInfo, LinePair, MatchResult};
use error_set::error_set;
use log::debug;
use similar::TextDiff;

/// Context lines requested from the diff engine around each change
pub const DIFF_CONTEXT: usize = 3;

error_set! {
    /// Errors from interpreting the structural diff.
    ///
    /// All of these mean the diff engine broke its contract; none is caused
    /// by the documents themselves.
    DiffError := {
        /// Hunk header is not of the form `@@ -a[,b] +c[,d] @@`
        #[display("Malformed hunk header '{line}'")]
        InvalidHunkHeader { line: String },
        /// Body line without a ` `, `-` or `+` tag
        #[display("Unexpected line in hunk body '{line}'")]
        UnexpectedLine { line: String },
        /// Body does not contain the number of lines its header declares
        #[display("Hunk {header} has {old_lines} old and {new_lines} new lines")]
        HunkLengthMismatch {
            header: String,
            old_lines: usize,
            new_lines: usize,
        },
        /// Hunk starts before the previous one ended, or its sides disagree
        #[display("Hunk {header} does not follow the previous hunk")]
        HunkOutOfOrder { header: String },
        /// Diff refers to a line beyond the end of a document
        #[display("Diff refers to left line {left} / right line {right} outside the documents")]
        LineOutOfRange { left: usize, right: usize },
        /// Documents differ but the engine reported no hunks
        #[display("Documents differ but the diff has no hunks")]
        MissingHunks,
    }
}

/// A line-level diff engine producing unified diff text.
pub trait LineDiff {
    /// Diff `left` against `right` (each line `\n`-terminated) with
    /// `context` unchanged lines around every change.
    fn unified(&self, left: &[String], right: &[String], context: usize) -> String;
}

/// Diff algorithm used by [`SimilarLineDiff`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffAlgorithm {
    #[default]
    Myers,
    Patience,
    Lcs,
}

impl From<DiffAlgorithm> for similar::Algorithm {
    fn from(algorithm: DiffAlgorithm) -> Self {
        match algorithm {
            DiffAlgorithm::Myers => similar::Algorithm::Myers,
            DiffAlgorithm::Patience => similar::Algorithm::Patience,
            DiffAlgorithm::Lcs => similar::Algorithm::Lcs,
        }
    }
}

/// [`LineDiff`] backed by the `similar` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarLineDiff {
    algorithm: DiffAlgorithm,
}

impl SimilarLineDiff {
    pub fn new(algorithm: DiffAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl LineDiff for SimilarLineDiff {
    fn unified(&self, left: &[String], right: &[String], context: usize) -> String {
        // Diff the lines as already split; re-tokenizing would treat a lone
        // `\r` as a line break.
        let old: Vec<&str> = left.iter().map(String::as_str).collect();
        let new: Vec<&str> = right.iter().map(String::as_str).collect();

        let diff = TextDiff::configure()
            .algorithm(self.algorithm.into())
            .diff_slices(&old, &new);

        diff.unified_diff()
            .context_radius(context)
            .header("left", "right")
            .to_string()
    }
}

/// Lines flagged by the diff as purely removed or purely added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    /// 0-based left line numbers removed from the left document
    pub removed: Vec<usize>,
    /// 0-based right line numbers added in the right document
    pub added: Vec<usize>,
}

/// Walk the hunks of `diff`, pairing unchanged lines directly in `result`.
///
/// Unchanged lines outside any hunk and `common` lines inside hunks are
/// written as direct pairs. Removed and added lines are returned as
/// [`Candidates`] for the similarity matcher.
pub fn align(
    left: &[String],
    right: &[String],
    diff: &FileDiff,
    context_size: usize,
    result: &mut MatchResult,
) -> Result<Candidates, DiffError> {
    let mut candidates = Candidates::default();
    let mut left_cursor = 0usize;
    let mut right_cursor = 0usize;

    let pair_direct = |l: usize, r: usize, result: &mut MatchResult| {
        if l >= left.len() || r >= right.len() {
            return Err(DiffError::LineOutOfRange { left: l, right: r });
        }
        result[l] = Some(LinePair::new(
            LineInfo::new(l, left, context_size),
            LineInfo::new(r, right, context_size),
        ));
        Ok(())
    };

    for hunk in &diff.hunks {
        let header = || format!("-{} +{}", hunk.old, hunk.new);

        if left_cursor > hunk.old.first_index() {
            return Err(DiffError::HunkOutOfOrder { header: header() });
        }
        while left_cursor < hunk.old.first_index() {
            pair_direct(left_cursor, right_cursor, result)?;
            left_cursor += 1;
            right_cursor += 1;
        }
        if right_cursor != hunk.new.first_index() {
            return Err(DiffError::HunkOutOfOrder { header: header() });
        }

        for line in &hunk.lines {
            match line {
                HunkLine::Common => {
                    pair_direct(left_cursor, right_cursor, result)?;
                    left_cursor += 1;
                    right_cursor += 1;
                }
                HunkLine::Removed => {
                    if left_cursor >= left.len() {
                        return Err(DiffError::LineOutOfRange {
                            left: left_cursor,
                            right: right_cursor,
                        });
                    }
                    candidates.removed.push(left_cursor);
                    left_cursor += 1;
                }
                HunkLine::Added => {
                    if right_cursor >= right.len() {
                        return Err(DiffError::LineOutOfRange {
                            left: left_cursor,
                            right: right_cursor,
                        });
                    }
                    candidates.added.push(right_cursor);
                    right_cursor += 1;
                }
            }
        }

        left_cursor = hunk.old.end_index();
        right_cursor = hunk.new.end_index();
    }

    while left_cursor < left.len() {
        pair_direct(left_cursor, right_cursor, result)?;
        left_cursor += 1;
        right_cursor += 1;
    }

    debug!(
        "diff: {} hunks, {} removed, {} added",
        diff.hunks.len(),
        candidates.removed.len(),
        candidates.added.len()
    );

    Ok(candidates)
}
