#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use crate::config::SimilarityConfig;
    use crate::similarity::{compare, compare_percent, Algorithm, ALGORITHMS};

    fn config() -> SimilarityConfig {
        SimilarityConfig::default()
    }

    #[test]
    fn test_identity_scores_one_for_every_algorithm() {
        let text = "der schnelle braune fuchs springt über den faulen hund";
        for algorithm in ALGORITHMS {
            let score = compare(text, text, algorithm, &config());
            assert!(
                (score - 1.0).abs() < 1e-9,
                "{} should score identical documents 1.0, got {}",
                algorithm,
                score
            );
        }
    }

    #[test]
    fn test_empty_documents_score_zero_for_every_algorithm() {
        for algorithm in ALGORITHMS {
            assert_eq!(
                compare("", "", algorithm, &config()),
                0.0,
                "{} should treat empty/empty as the degenerate zero case",
                algorithm
            );
            assert_eq!(compare("some words here", "", algorithm, &config()), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let text_a = "machine learning models need training data";
        let text_b = "training data quality drives model accuracy";
        for algorithm in [Algorithm::Jaccard, Algorithm::Dice, Algorithm::Cosine] {
            let forward = compare(text_a, text_b, algorithm, &config());
            let backward = compare(text_b, text_a, algorithm, &config());
            assert!(
                (forward - backward).abs() < 1e-12,
                "{} must be symmetric ({} vs {})",
                algorithm,
                forward,
                backward
            );
        }
    }

    #[test]
    fn test_jaccard_exact_fraction() {
        // Sets {alpha, bravo, charlie} and {bravo, charlie, delta}:
        // intersection 2, union 4
        let score = compare(
            "alpha bravo charlie",
            "bravo charlie delta",
            Algorithm::Jaccard,
            &config(),
        );
        assert!((score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dice_exact_fraction() {
        // 2·2 / (3 + 3)
        let score = compare(
            "alpha bravo charlie",
            "bravo charlie delta",
            Algorithm::Dice,
            &config(),
        );
        assert!((score - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_ignores_duplicate_tokens() {
        let score = compare(
            "apple apple banana",
            "apple banana banana",
            Algorithm::Jaccard,
            &config(),
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_cosine_counts_duplicate_tokens() {
        // Same token sets but different frequencies must not score 1.0
        let score = compare(
            "apple apple apple banana",
            "apple banana banana banana",
            Algorithm::Cosine,
            &config(),
        );
        assert!(score > 0.0 && score < 1.0, "got {}", score);
    }

    #[test]
    fn test_cosine_orthogonal_documents() {
        let score = compare(
            "alpha bravo charlie",
            "delta echo foxtrot",
            Algorithm::Cosine,
            &config(),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_minhash_near_duplicates_score_high() {
        let text_a = "the committee met on tuesday to review the annual renovation proposal in detail";
        let text_b = "the committee met on wednesday to review the annual renovation proposal in detail";
        let score = compare(text_a, text_b, Algorithm::MinHash, &config());
        assert!(
            score > 0.3,
            "near-duplicates should keep most signature slots, got {}",
            score
        );
    }

    #[test]
    fn test_minhash_unrelated_documents_score_low() {
        let text_a = "quantum entanglement experiments require cryogenic isolation chambers";
        let text_b = "gardening tips for growing tomatoes during rainy summers outside";
        let score = compare(text_a, text_b, Algorithm::MinHash, &config());
        assert!(score < 0.2, "unrelated documents scored {}", score);
    }

    #[test]
    fn test_percent_scale() {
        let text = "identical text scores one hundred percent";
        assert_eq!(
            compare_percent(text, text, Algorithm::Jaccard, &config()),
            100.0
        );
        assert_eq!(compare_percent(text, "", Algorithm::Dice, &config()), 0.0);

        let partial = compare_percent(
            "alpha bravo charlie",
            "bravo charlie delta",
            Algorithm::Jaccard,
            &config(),
        );
        assert_eq!(partial, 50.0);
    }

    #[test]
    fn test_algorithms_are_independent_scales() {
        let text_a = "one two three four five six seven";
        let text_b = "one two three nine ten eleven twelve";
        let jaccard = compare(text_a, text_b, Algorithm::Jaccard, &config());
        let dice = compare(text_a, text_b, Algorithm::Dice, &config());
        // Dice is systematically at least Jaccard for the same overlap
        assert!(dice >= jaccard);
    }
}
