//! Tag normalization for location tags
//!
//! Tag values must stay stable regardless of capitalization or encoding
//! variant of the source text, so folding runs before stripping: `Köln`
//! and `Koeln` both end up as `koeln`.

/// Normalize a location value into a tag token: lowercase, German
/// diacritics folded to ASCII digraphs, non-alphanumerics stripped.
pub fn normalize_tag(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());
    for c in value.to_lowercase().chars() {
        match c {
            'ä' => folded.push_str("ae"),
            'ö' => folded.push_str("oe"),
            'ü' => folded.push_str("ue"),
            'ß' => folded.push_str("ss"),
            _ => folded.push(c),
        }
    }

    folded.retain(|c| c.is_alphanumeric());
    folded
}

/// Tags for a resolved location: normalized city and state, deduplicated
/// (city states like Berlin fold to a single tag), empties dropped.
pub fn location_tags(city: &str, state: &str) -> Vec<String> {
    let mut tags = Vec::with_capacity(2);
    for value in [city, state] {
        let tag = normalize_tag(value);
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diacritics_fold_before_stripping() {
        assert_eq!(normalize_tag("Köln"), "koeln");
        assert_eq!(normalize_tag("München"), "muenchen");
        assert_eq!(normalize_tag("Straßberg"), "strassberg");
    }

    #[test]
    fn test_uppercase_umlauts_fold_via_lowercasing() {
        assert_eq!(normalize_tag("ÖSTERREICH"), "oesterreich");
        assert_eq!(normalize_tag("Übersee"), "uebersee");
    }

    #[test]
    fn test_compound_names_become_single_token() {
        assert_eq!(normalize_tag("Baden-Württemberg"), "badenwuerttemberg");
        assert_eq!(normalize_tag("Mecklenburg-Vorpommern"), "mecklenburgvorpommern");
        assert_eq!(normalize_tag("Frankfurt am Main"), "frankfurtammain");
    }

    #[test]
    fn test_encoding_variants_agree() {
        assert_eq!(normalize_tag("Köln"), normalize_tag("Koeln"));
        assert_eq!(normalize_tag("KÖLN"), normalize_tag("köln"));
    }

    #[test]
    fn test_location_tags_city_and_state() {
        assert_eq!(
            location_tags("München", "Bayern"),
            vec!["muenchen", "bayern"]
        );
    }

    #[test]
    fn test_location_tags_dedupe_city_states() {
        assert_eq!(location_tags("Berlin", "Berlin"), vec!["berlin"]);
    }

    #[test]
    fn test_location_tags_drop_empty_values() {
        assert_eq!(location_tags("", "Hessen"), vec!["hessen"]);
        assert_eq!(location_tags("", ""), Vec::<String>::new());
    }
}
