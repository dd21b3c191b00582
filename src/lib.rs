//! Line-level tracking between two versions of a text document.
//!
//! For every line of the left (old) version, find the line it became in the
//! right (new) version, or report it as deleted. Lines that the structural
//! diff keeps are paired directly; removed and added lines are then matched
//! by content and context similarity, so edited, reformatted and moved lines
//! are still recognised.
//!
//! # Examples
//!
//! ```
//! let result = lhdiff::lhdiff("x\nhelllo world\ny\n", "x\nhello world\ny\n", 4).unwrap();
//! let pairs: Vec<_> = result
//!     .iter()
//!     .map(|slot| slot.as_ref().map(|pair| pair.line_numbers()))
//!     .collect();
//! assert_eq!(pairs, vec![Some((0, 0)), Some((1, 1)), Some((2, 2))]);
//! ```

use error_set::error_set;
use log::debug;
use std::fs;
use std::path::Path;

pub mod context;
pub mod diff;
pub mod line;
pub mod matcher;
pub mod normalize;
pub mod output;
pub mod similarity;

pub use diff::{DiffAlgorithm, DiffError, LineDiff, SimilarLineDiff};
pub use line::{LineInfo, LinePair, MatchResult};
pub use matcher::{Assignment, unmatched_right_lines};
pub use output::format_pairs;
pub use similarity::{TextSimilarity, TfIdfCosine};

use diff::{DIFF_CONTEXT, FileDiff};
use normalize::normalize_lines;

/// Default number of significant context lines above and below a line
pub const DEFAULT_CONTEXT_SIZE: usize = 4;

error_set! {
    /// Top-level error for lhdiff operations
    LhdiffError := {
        #[display("Failed to read {path}: {message}")]
        ReadFailed { path: String, message: String },
        DiffError(DiffError),
    }
}

/// Tuning for a [`LineMatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Significant context lines gathered on each side of a line
    pub context_size: usize,
    /// How added lines claim removed lines
    pub assignment: Assignment,
    /// Algorithm for the default diff engine
    pub algorithm: DiffAlgorithm,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            context_size: DEFAULT_CONTEXT_SIZE,
            assignment: Assignment::default(),
            algorithm: DiffAlgorithm::default(),
        }
    }
}

/// Main interface: matches the lines of two document versions.
pub struct LineMatcher<D = SimilarLineDiff, S = TfIdfCosine> {
    config: MatchConfig,
    diff: D,
    similarity: S,
}

impl LineMatcher {
    /// Create a matcher using the `similar` diff engine and TF-IDF cosine
    /// context similarity.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            diff: SimilarLineDiff::new(config.algorithm),
            similarity: TfIdfCosine,
            config,
        }
    }
}

impl Default for LineMatcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl<D: LineDiff, S: TextSimilarity> LineMatcher<D, S> {
    /// Create a matcher with custom collaborators.
    ///
    /// `config.algorithm` is ignored; `diff` decides how lines are diffed.
    pub fn with_engines(config: MatchConfig, diff: D, similarity: S) -> Self {
        Self {
            config,
            diff,
            similarity,
        }
    }

    /// Match the lines of `left` against the lines of `right`.
    ///
    /// The result has one slot per left line. Identical documents (after
    /// whitespace normalization) are paired line by line without diffing.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError`] only if the diff engine produces output that
    /// does not describe the two documents.
    pub fn match_texts(&self, left: &str, right: &str) -> Result<MatchResult, DiffError> {
        let left_lines = normalize_lines(left);
        let right_lines = normalize_lines(right);
        let context_size = self.config.context_size;
        debug!(
            "matching {} left lines against {} right lines",
            left_lines.len(),
            right_lines.len()
        );

        let mut result: MatchResult = vec![None; left_lines.len()];

        if left_lines == right_lines {
            debug!("documents are identical");
            for (n, slot) in result.iter_mut().enumerate() {
                let info = LineInfo::new(n, &left_lines, context_size);
                *slot = Some(LinePair::new(info.clone(), info));
            }
            return Ok(result);
        }

        let unified = self.diff.unified(&left_lines, &right_lines, DIFF_CONTEXT);
        let file_diff = FileDiff::parse(&unified)?;
        if file_diff.is_empty() {
            return Err(DiffError::MissingHunks);
        }

        let candidates = diff::align(
            &left_lines,
            &right_lines,
            &file_diff,
            context_size,
            &mut result,
        )?;

        let removed: Vec<LineInfo> = candidates
            .removed
            .iter()
            .map(|&n| LineInfo::new(n, &left_lines, context_size))
            .collect();
        let added: Vec<LineInfo> = candidates
            .added
            .iter()
            .map(|&n| LineInfo::new(n, &right_lines, context_size))
            .collect();

        matcher::assign(
            &removed,
            &added,
            &self.similarity,
            self.config.assignment,
            &mut result,
        );

        debug!(
            "{} of {} left lines matched",
            result.iter().flatten().count(),
            result.len()
        );

        Ok(result)
    }

    /// Read two files and match their lines.
    ///
    /// # Examples
    /// ```no_run
    /// # use lhdiff::{LineMatcher, MatchConfig};
    /// let matcher = LineMatcher::new(MatchConfig::default());
    /// let result = matcher.match_files("old/main.rs", "new/main.rs").unwrap();
    /// print!("{}", lhdiff::format_pairs(&result, false));
    /// ```
    pub fn match_files(
        &self,
        left: impl AsRef<Path>,
        right: impl AsRef<Path>,
    ) -> Result<MatchResult, LhdiffError> {
        let left = read_document(left.as_ref())?;
        let right = read_document(right.as_ref())?;
        Ok(self.match_texts(&left, &right)?)
    }
}

fn read_document(path: &Path) -> Result<String, LhdiffError> {
    fs::read_to_string(path).map_err(|e| LhdiffError::ReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Match `left` against `right` with default settings and the given
/// context size.
pub fn lhdiff(left: &str, right: &str, context_size: usize) -> Result<MatchResult, DiffError> {
    let config = MatchConfig {
        context_size,
        ..MatchConfig::default()
    };
    LineMatcher::new(config).match_texts(left, right)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn line_numbers(result: &MatchResult) -> Vec<Option<(usize, usize)>> {
        result
            .iter()
            .map(|slot| slot.as_ref().map(LinePair::line_numbers))
            .collect()
    }

    fn run(left: &[&str], right: &[&str]) -> Vec<Option<(usize, usize)>> {
        line_numbers(&lhdiff(&left.join("\n"), &right.join("\n"), 4).unwrap())
    }

    #[test]
    fn identical_documents_pair_by_index() {
        assert_eq!(
            run(&["foo", "bar", "baz"], &["foo", "bar", "baz"]),
            vec![Some((0, 0)), Some((1, 1)), Some((2, 2))]
        );
    }

    #[test]
    fn dissimilar_replacement_is_deleted() {
        assert_eq!(run(&["foo", "bar"], &["foo", "qux"]), vec![Some((0, 0)), None]);
    }

    #[test]
    fn edited_line_is_tracked() {
        assert_eq!(
            run(&["x", "helllo world", "y"], &["x", "hello world", "y"]),
            vec![Some((0, 0)), Some((1, 1)), Some((2, 2))]
        );
    }

    #[test]
    fn empty_documents() {
        assert!(lhdiff("", "", 4).unwrap().is_empty());
    }

    #[test]
    fn whitespace_only_changes_count_as_identical() {
        let result = lhdiff("fn  main() {\n\tx();\n}\n", "fn main() {\n    x();\n}", 2).unwrap();
        assert_eq!(
            line_numbers(&result),
            vec![Some((0, 0)), Some((1, 1)), Some((2, 2))]
        );
    }

    #[test]
    fn pairs_carry_content_and_context() {
        let result = lhdiff("a\nb\nc", "a\nb\nc", 1).unwrap();
        let pair = result[1].as_ref().unwrap();
        assert_eq!(pair.left.content(), "b\n");
        assert_eq!(pair.left.context(), "a\nc\n");
        assert_eq!(pair.right.context(), "a\nc\n");
    }

    #[test]
    fn reformatted_and_edited_lines() {
        let left = "\
fn total(items: &[u32]) -> u32 {
    let mut sum = 0;
    for item in items {
        sum += item;
    }
    sum
}
";
        let right = "\
fn total(items: &[u32]) -> u64 {
    let mut sum: u64 = 0;
    for item in items {
        sum += u64::from(*item);
    }
    sum
}
";
        let result = lhdiff(left, right, 4).unwrap();
        assert_eq!(
            line_numbers(&result),
            (0..7).map(|i| Some((i, i))).collect::<Vec<_>>()
        );
    }

    #[test]
    fn deleted_line_in_the_middle() {
        assert_eq!(
            run(
                &["alpha", "beta", "gamma", "delta"],
                &["alpha", "gamma", "delta"]
            ),
            vec![Some((0, 0)), None, Some((2, 1)), Some((3, 2))]
        );
    }

    #[test]
    fn carriage_return_inside_a_line() {
        let result = lhdiff("a\rb\nc\nd\n", "a\rb\nx\nd\n", 4).unwrap();
        assert_eq!(
            line_numbers(&result),
            vec![Some((0, 0)), None, Some((2, 2))]
        );
    }

    #[test]
    fn carriage_return_far_before_the_change() {
        let left = "a\rb\n1\n2\n3\n4\n5\nlet total = 1;\n6\n";
        let right = "a\rb\n1\n2\n3\n4\n5\nlet total = 2;\n6\n";
        let result = lhdiff(left, right, 4).unwrap();
        assert_eq!(
            line_numbers(&result),
            (0..8).map(|i| Some((i, i))).collect::<Vec<_>>()
        );
    }

    #[test]
    fn unmatched_right_lines_are_additions() {
        let left = "one\ntwo\nthree";
        let right = "one\ntwo\ninserted line\nthree";
        let result = lhdiff(left, right, 4).unwrap();
        assert_eq!(unmatched_right_lines(&result, 4), vec![2]);
    }

    #[test]
    fn custom_engines_are_used() {
        struct NeverSimilar;
        impl TextSimilarity for NeverSimilar {
            fn similarity(&self, _: &str, _: &str) -> f64 {
                0.0
            }
        }

        let matcher = LineMatcher::with_engines(
            MatchConfig::default(),
            SimilarLineDiff::new(DiffAlgorithm::Patience),
            NeverSimilar,
        );
        // Content alone (0.6 * 12/13) still clears the threshold
        let result = matcher
            .match_texts("x\nhelllo world\ny", "x\nhello world\ny")
            .unwrap();
        assert_eq!(line_numbers(&result)[1], Some((1, 1)));
    }

    #[test]
    fn broken_diff_engine_is_reported() {
        struct Garbage;
        impl LineDiff for Garbage {
            fn unified(&self, _: &[String], _: &[String], _: usize) -> String {
                "@@ garbage\n".to_string()
            }
        }

        let matcher = LineMatcher::with_engines(MatchConfig::default(), Garbage, TfIdfCosine);
        assert!(matches!(
            matcher.match_texts("a", "b"),
            Err(DiffError::InvalidHunkHeader { .. })
        ));
    }

    #[test]
    fn silent_diff_engine_is_reported() {
        struct Silent;
        impl LineDiff for Silent {
            fn unified(&self, _: &[String], _: &[String], _: usize) -> String {
                String::new()
            }
        }

        let matcher = LineMatcher::with_engines(MatchConfig::default(), Silent, TfIdfCosine);
        assert!(matches!(
            matcher.match_texts("a", "b"),
            Err(DiffError::MissingHunks)
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        assert!(matches!(
            LineMatcher::new(MatchConfig::default()).match_files(&missing, &missing),
            Err(LhdiffError::ReadFailed { .. })
        ));
    }

    mod proptests {
        use crate::{LinePair, lhdiff};
        use proptest::prelude::*;

        fn arb_document() -> impl Strategy<Value = String> {
            prop::collection::vec("[a-d ]{0,8}", 0..12).prop_map(|lines| lines.join("\n"))
        }

        proptest! {
            #[test]
            fn identity(text in arb_document(), context_size in 0usize..6) {
                let result = lhdiff(&text, &text, context_size).unwrap();
                for (i, slot) in result.iter().enumerate() {
                    prop_assert_eq!(slot.as_ref().map(LinePair::line_numbers), Some((i, i)));
                }
            }

            #[test]
            fn one_slot_per_left_line(left in arb_document(), right in arb_document()) {
                let result = lhdiff(&left, &right, 3).unwrap();
                prop_assert_eq!(result.len(), left.lines().count());
                for (i, slot) in result.iter().enumerate() {
                    if let Some(pair) = slot {
                        prop_assert_eq!(pair.left.line_number(), i);
                    }
                }
            }

            #[test]
            fn right_line_numbers_in_range(left in arb_document(), right in arb_document()) {
                let result = lhdiff(&left, &right, 2).unwrap();
                let right_len = right.lines().count();
                for pair in result.iter().flatten() {
                    prop_assert!(pair.right.line_number() < right_len);
                }
            }
        }
    }
}
