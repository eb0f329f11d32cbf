//! Similarity engine comparing two documents under interchangeable algorithms
//!
//! All algorithms consume tokenized text (see [`crate::text::tokenize`]) and
//! produce a score in [0.0, 1.0]. Scores are comparable within one
//! algorithm, not across algorithms. Degenerate inputs (empty documents)
//! always score 0.0; no algorithm fails.

mod minhash;

#[cfg(test)]
mod tests;

pub use minhash::{MinHasher, PolynomialHasher, SeededHasher};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::config::SimilarityConfig;
use crate::error::MuslixError;
use crate::text::tokenize;

/// Algorithm selector for [`compare`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Set overlap over set union
    Jaccard,
    /// Twice the set overlap over the summed set sizes
    Dice,
    /// Term-frequency cosine over the union vocabulary
    Cosine,
    /// Signature agreement over seeded minimum hashes of token shingles
    MinHash,
}

impl FromStr for Algorithm {
    type Err = MuslixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jaccard" => Ok(Algorithm::Jaccard),
            "dice" => Ok(Algorithm::Dice),
            "cosine" => Ok(Algorithm::Cosine),
            "minhash" => Ok(Algorithm::MinHash),
            other => Err(MuslixError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Jaccard => write!(f, "jaccard"),
            Algorithm::Dice => write!(f, "dice"),
            Algorithm::Cosine => write!(f, "cosine"),
            Algorithm::MinHash => write!(f, "minhash"),
        }
    }
}

/// All selectable algorithms, in display order
pub const ALGORITHMS: [Algorithm; 4] = [
    Algorithm::Jaccard,
    Algorithm::Dice,
    Algorithm::Cosine,
    Algorithm::MinHash,
];

/// Compare two documents, returning a score in [0.0, 1.0]
pub fn compare(text_a: &str, text_b: &str, algorithm: Algorithm, config: &SimilarityConfig) -> f64 {
    match algorithm {
        Algorithm::Jaccard => jaccard(text_a, text_b),
        Algorithm::Dice => dice(text_a, text_b),
        Algorithm::Cosine => cosine(text_a, text_b),
        Algorithm::MinHash => MinHasher::new(config).similarity(text_a, text_b),
    }
}

/// Compare two documents, reporting the score as a percentage (0-100)
/// rounded to two decimal places
pub fn compare_percent(
    text_a: &str,
    text_b: &str,
    algorithm: Algorithm,
    config: &SimilarityConfig,
) -> f64 {
    (compare(text_a, text_b, algorithm, config) * 10_000.0).round() / 100.0
}

fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// Jaccard coefficient: |A ∩ B| / |A ∪ B|
fn jaccard(text_a: &str, text_b: &str) -> f64 {
    let set_a = token_set(text_a);
    let set_b = token_set(text_b);

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();

    intersection as f64 / union as f64
}

/// Dice coefficient: 2·|A ∩ B| / (|A| + |B|)
fn dice(text_a: &str, text_b: &str) -> f64 {
    let set_a = token_set(text_a);
    let set_b = token_set(text_b);

    let total = set_a.len() + set_b.len();
    if total == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();

    (2 * intersection) as f64 / total as f64
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut freqs = HashMap::new();
    for token in tokenize(text) {
        *freqs.entry(token).or_insert(0.0) += 1.0;
    }
    freqs
}

/// Cosine similarity over term-frequency vectors spanning the union
/// vocabulary of both documents (duplicate tokens counted).
///
/// The vocabulary is sorted so the summation order, and with it the exact
/// floating-point result, is deterministic.
fn cosine(text_a: &str, text_b: &str) -> f64 {
    let freqs_a = term_frequencies(text_a);
    let freqs_b = term_frequencies(text_b);

    let mut vocabulary: Vec<&String> = freqs_a.keys().chain(freqs_b.keys()).collect();
    vocabulary.sort();
    vocabulary.dedup();

    let mut dot = 0.0;
    let mut norm_a_sq = 0.0;
    let mut norm_b_sq = 0.0;
    for term in vocabulary {
        let weight_a = freqs_a.get(term).copied().unwrap_or(0.0);
        let weight_b = freqs_b.get(term).copied().unwrap_or(0.0);
        dot += weight_a * weight_b;
        norm_a_sq += weight_a * weight_a;
        norm_b_sq += weight_b * weight_b;
    }

    if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        return 0.0;
    }

    dot / (norm_a_sq.sqrt() * norm_b_sq.sqrt())
}
