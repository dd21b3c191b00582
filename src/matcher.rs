//! Similarity-based assignment of added lines to removed lines.

use crate::line::{LineInfo, LinePair, MatchResult};
use crate::similarity::{TextSimilarity, combined_similarity, is_match};
use log::trace;
use std::collections::HashSet;

/// How added lines claim removed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assignment {
    /// Each added line, in document order, takes its best removed line.
    /// A later added line with the same best removed line replaces the
    /// earlier assignment.
    #[default]
    Overwrite,
    /// All pairs above the threshold are ranked by score and accepted
    /// highest first; each removed and each added line is used at most once.
    BestFirst,
}

/// Match `added` lines against `removed` lines, writing accepted pairs into
/// `result` at the removed line's index.
pub fn assign<S: TextSimilarity + ?Sized>(
    removed: &[LineInfo],
    added: &[LineInfo],
    similarity: &S,
    assignment: Assignment,
    result: &mut MatchResult,
) {
    if removed.is_empty() || added.is_empty() {
        return;
    }

    match assignment {
        Assignment::Overwrite => assign_overwrite(removed, added, similarity, result),
        Assignment::BestFirst => assign_best_first(removed, added, similarity, result),
    }
}

fn assign_overwrite<S: TextSimilarity + ?Sized>(
    removed: &[LineInfo],
    added: &[LineInfo],
    similarity: &S,
    result: &mut MatchResult,
) {
    for right in added {
        let mut best: Option<(&LineInfo, f64)> = None;
        for left in removed {
            let score = combined_similarity(left, right, similarity);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((left, score));
            }
        }

        let Some((left, score)) = best else {
            continue;
        };
        if !is_match(score) {
            continue;
        }

        let slot = &mut result[left.line_number()];
        if let Some(previous) = slot.as_ref() {
            trace!(
                "left {} reassigned from right {} to right {}",
                left.line_number(),
                previous.right.line_number(),
                right.line_number()
            );
        } else {
            trace!(
                "left {} matched right {} ({:.3})",
                left.line_number(),
                right.line_number(),
                score
            );
        }
        *slot = Some(LinePair::new(left.clone(), right.clone()));
    }
}

fn assign_best_first<S: TextSimilarity + ?Sized>(
    removed: &[LineInfo],
    added: &[LineInfo],
    similarity: &S,
    result: &mut MatchResult,
) {
    let mut scored = Vec::new();
    for (r, right) in added.iter().enumerate() {
        for (l, left) in removed.iter().enumerate() {
            let score = combined_similarity(left, right, similarity);
            if is_match(score) {
                scored.push((score, l, r));
            }
        }
    }
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut claimed_left = HashSet::new();
    let mut claimed_right = HashSet::new();
    for (score, l, r) in scored {
        if claimed_left.contains(&l) || claimed_right.contains(&r) {
            continue;
        }
        claimed_left.insert(l);
        claimed_right.insert(r);

        let (left, right) = (&removed[l], &added[r]);
        trace!(
            "left {} matched right {} ({:.3})",
            left.line_number(),
            right.line_number(),
            score
        );
        result[left.line_number()] = Some(LinePair::new(left.clone(), right.clone()));
    }
}

/// Right line numbers that appear in no pair of `result`.
///
/// `right_len` is the number of lines in the right document.
pub fn unmatched_right_lines(result: &MatchResult, right_len: usize) -> Vec<usize> {
    let matched: HashSet<usize> = result
        .iter()
        .flatten()
        .map(|pair| pair.right.line_number())
        .collect();
    (0..right_len).filter(|n| !matched.contains(n)).collect()
}
