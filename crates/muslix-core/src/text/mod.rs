//! Text tokenization for the similarity engine

/// Tokens shorter than this carry too little signal for comparison
const MIN_TOKEN_CHARS: usize = 3;

/// Simple word-based tokenizer splitting on non-alphanumeric characters.
///
/// Lowercases the input, treats every non-alphanumeric character as a
/// separator and drops tokens shorter than three characters. Deterministic
/// and pure; empty input yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.chars().count() >= MIN_TOKEN_CHARS)
        .map(|s| s.to_string())
        .collect()
}
