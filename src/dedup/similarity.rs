//! Text similarity scores in `[0, 1]`.
//!
//! | Metric | Compares |
//! |--------|----------|
//! | [`character_similarity`] | sets of non-whitespace characters |
//! | [`word_similarity`] | sets of words longer than two characters |
//! | [`edit_similarity`] | Levenshtein distance over characters |
//!
//! [`composite_similarity`] blends the three. An exact match after trimming
//! short-circuits to `1.0`.

use std::collections::HashSet;
use std::hash::Hash;

use crate::config::SimilarityWeights;

fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn char_set(text: &str) -> HashSet<char> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() > 2)
        .collect()
}

/// Jaccard index of lowercased, whitespace-free character sets.
pub fn character_similarity(a: &str, b: &str) -> f64 {
    jaccard(&char_set(a), &char_set(b))
}

/// Jaccard index of lowercased word sets, ignoring words of one or two
/// characters.
///
/// `1.0` when neither side has a qualifying word, `0.0` when only one does.
pub fn word_similarity(a: &str, b: &str) -> f64 {
    let (wa, wb) = (word_set(a), word_set(b));
    match (wa.is_empty(), wb.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => jaccard(&wa, &wb),
    }
}

/// `(max_len - levenshtein) / max_len`, counted in characters.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Weighted blend of the three metrics.
///
/// # Example
///
/// ```rust
/// use chatpaste::config::SimilarityWeights;
/// use chatpaste::dedup::composite_similarity;
///
/// let w = SimilarityWeights::default();
/// assert_eq!(composite_similarity("  same text ", "same text", w), 1.0);
/// assert!(composite_similarity("release notes", "grocery list", w) < 0.5);
/// ```
pub fn composite_similarity(a: &str, b: &str, weights: SimilarityWeights) -> f64 {
    if a.trim() == b.trim() {
        return 1.0;
    }
    weights.character * character_similarity(a, b)
        + weights.word * word_similarity(a, b)
        + weights.edit * edit_similarity(a, b)
}
