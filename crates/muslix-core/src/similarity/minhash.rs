//! MinHash signatures over token shingles
//!
//! A signature holds one minimum hash value per independent seeded hash
//! function; the similarity of two documents is the fraction of signature
//! slots where both minima agree. This approximates Jaccard similarity of
//! the shingle sets at fixed cost.

use crate::config::SimilarityConfig;
use crate::text::tokenize;

/// A deterministic, seeded string hasher.
///
/// Determinism within a process is the only requirement; cryptographic
/// strength is not. Reasonable avalanche behavior keeps slot collisions
/// close to the Jaccard expectation.
pub trait SeededHasher {
    fn hash(&self, input: &str, seed: u64) -> u64;
}

/// Default hasher: multiplicative polynomial rolling hash mixed with the seed
#[derive(Debug, Clone, Copy, Default)]
pub struct PolynomialHasher;

impl SeededHasher for PolynomialHasher {
    fn hash(&self, input: &str, seed: u64) -> u64 {
        let mut hash = seed ^ 0x9e37_79b9_7f4a_7c15;
        for byte in input.as_bytes() {
            hash = hash
                .wrapping_mul(0x0000_0100_0000_01b3)
                .wrapping_add(u64::from(*byte));
        }
        // Final mix so short shingles still spread across the range
        hash ^= hash >> 33;
        hash.wrapping_mul(0xff51_afd7_ed55_8ccd)
    }
}

/// MinHash signature generator with a pluggable seeded hasher
pub struct MinHasher<H: SeededHasher = PolynomialHasher> {
    num_hashes: usize,
    shingle_size: usize,
    hasher: H,
}

impl MinHasher<PolynomialHasher> {
    /// Create a generator with the configured hash count and shingle size
    pub fn new(config: &SimilarityConfig) -> Self {
        Self::with_hasher(config, PolynomialHasher)
    }
}

impl<H: SeededHasher> MinHasher<H> {
    pub fn with_hasher(config: &SimilarityConfig, hasher: H) -> Self {
        MinHasher {
            num_hashes: config.minhash_hashes,
            shingle_size: config.shingle_size,
            hasher,
        }
    }

    /// Contiguous token windows of the configured size, joined by a space.
    /// A document with fewer tokens than the shingle size has no shingles.
    pub fn shingles(&self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        if tokens.len() < self.shingle_size {
            return Vec::new();
        }
        tokens
            .windows(self.shingle_size)
            .map(|window| window.join(" "))
            .collect()
    }

    /// Fixed-length signature: slot i holds the minimum of hash function i
    /// over all shingles. The length always equals the configured hash
    /// count; documents without shingles get all-max slots.
    pub fn signature(&self, text: &str) -> Vec<u64> {
        let shingles = self.shingles(text);
        let mut signature = vec![u64::MAX; self.num_hashes];

        for (slot, value) in signature.iter_mut().enumerate() {
            let seed = Self::seed_for(slot);
            for shingle in &shingles {
                let hash = self.hasher.hash(shingle, seed);
                if hash < *value {
                    *value = hash;
                }
            }
        }

        signature
    }

    /// Fraction of signature slots where both documents' minima are equal.
    /// 0.0 if either document has no shingles.
    pub fn similarity(&self, text_a: &str, text_b: &str) -> f64 {
        if self.num_hashes == 0 {
            return 0.0;
        }
        if self.shingles(text_a).is_empty() || self.shingles(text_b).is_empty() {
            return 0.0;
        }

        let sig_a = self.signature(text_a);
        let sig_b = self.signature(text_b);

        let matching = sig_a
            .iter()
            .zip(sig_b.iter())
            .filter(|(a, b)| a == b)
            .count();

        matching as f64 / self.num_hashes as f64
    }

    fn seed_for(slot: usize) -> u64 {
        (slot as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
    }
}
