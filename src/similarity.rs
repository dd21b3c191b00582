//! Content and context similarity between a left line and a right line.
//!
//! Content similarity is the normalized inverse of the Levenshtein distance
//! between the two lines. Context similarity compares the lines'
//! surroundings with a TF-IDF weighted cosine. The two are blended with
//! fixed weights, but only once the content itself is similar enough.

use crate::line::LineInfo;
use std::collections::{HashMap, HashSet};
use strsim::levenshtein;

/// Weight of content similarity in the combined score
pub const CONTENT_WEIGHT: f64 = 0.6;
/// Weight of context similarity in the combined score
pub const CONTEXT_WEIGHT: f64 = 0.4;
/// Content similarity at or below this value forces a combined score of 0
pub const CONTENT_GATE: f64 = 0.5;
/// Combined similarity must be strictly greater than this to match
pub const SIMILARITY_THRESHOLD: f64 = 0.45;

/// Similarity between two free-form text strings, in `[0, 1]`.
pub trait TextSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Cosine similarity of TF-IDF weighted term vectors.
///
/// Terms are whitespace separated. The two compared strings form the whole
/// corpus, and IDF is smoothed (`ln((1 + N) / (1 + df)) + 1`) so that terms
/// present in both documents still carry weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfCosine;

impl TextSimilarity for TfIdfCosine {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let tf_a = term_frequencies(a);
        let tf_b = term_frequencies(b);

        match (tf_a.is_empty(), tf_b.is_empty()) {
            (true, true) => return 1.0,
            (true, false) | (false, true) => return 0.0,
            (false, false) => {}
        }

        let terms: HashSet<&str> = tf_a.keys().chain(tf_b.keys()).copied().collect();
        let corpus_size = 2.0;

        let mut dot_product = 0.0;
        let mut norm_a = 0.0;
        let mut norm_b = 0.0;

        for term in terms {
            let count_a = tf_a.get(term).copied().unwrap_or(0) as f64;
            let count_b = tf_b.get(term).copied().unwrap_or(0) as f64;
            let document_frequency = [count_a, count_b].iter().filter(|c| **c > 0.0).count() as f64;
            let idf = ((1.0 + corpus_size) / (1.0 + document_frequency)).ln() + 1.0;

            let weight_a = count_a * idf;
            let weight_b = count_b * idf;
            dot_product += weight_a * weight_b;
            norm_a += weight_a * weight_a;
            norm_b += weight_b * weight_b;
        }

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        (dot_product / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
    }
}

fn term_frequencies(text: &str) -> HashMap<&str, usize> {
    let mut frequencies = HashMap::new();
    for term in text.split_whitespace() {
        *frequencies.entry(term).or_insert(0) += 1;
    }
    frequencies
}

/// `1 - distance / max_len`, with two empty strings counting as identical.
///
/// Distance and lengths count `char`s.
pub fn content_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Blend content and context similarity of a left and a right line.
///
/// Context similarity is only computed when content similarity clears
/// [`CONTENT_GATE`].
pub fn combined_similarity<S: TextSimilarity + ?Sized>(
    left: &LineInfo,
    right: &LineInfo,
    context: &S,
) -> f64 {
    let content = content_similarity(left.content(), right.content());
    if content <= CONTENT_GATE {
        return 0.0;
    }
    let context = context.similarity(left.context(), right.context());
    CONTENT_WEIGHT * content + CONTEXT_WEIGHT * context
}

/// Whether a combined score is high enough to accept a match.
pub fn is_match(score: f64) -> bool {
    score > SIMILARITY_THRESHOLD
}
