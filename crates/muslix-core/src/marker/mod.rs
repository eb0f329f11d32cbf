//! Marker-line parsing for sentinel-delimited records embedded in note bodies
//!
//! A marker line looks like
//! `MusliStart-<field1>;<field2>;...;<fieldN>-MusliEnde` and may sit
//! anywhere inside a larger HTML-ish body. The raw matched substring is
//! kept verbatim because write-back replaces that literal text; the
//! decoded form is what fields, display and reconstruction work on.

mod entities;

pub use entities::decode_entities;

use std::sync::OnceLock;

use regex::Regex;

/// Start sentinel of a marker line
pub const START_SENTINEL: &str = "MusliStart";

/// End sentinel of a marker line
pub const END_SENTINEL: &str = "MusliEnde";

/// Minimum number of fields in a valid record
pub const MIN_FIELDS: usize = 11;

/// Zero-based index of the City field (field 9, 1-indexed)
pub const CITY_FIELD: usize = 8;

/// Zero-based index of the PostalCode field (field 10, 1-indexed)
pub const POSTAL_CODE_FIELD: usize = 9;

/// Zero-based index of the State field (field 11, 1-indexed)
pub const STATE_FIELD: usize = 10;

static MARKER_RE: OnceLock<Regex> = OnceLock::new();

fn marker_regex() -> &'static Regex {
    MARKER_RE.get_or_init(|| {
        // Non-greedy up to the first end sentinel; `.` stays within the line
        Regex::new(r"MusliStart-(.*?)-MusliEnde").expect("marker pattern is valid")
    })
}

/// A marker record extracted from a note body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRecord {
    /// The matched substring exactly as it appears in the body,
    /// entities intact
    pub raw_line: String,
    /// Entity-decoded content between the sentinels
    pub decoded: String,
    /// Decoded fields, split on `;`
    pub fields: Vec<String>,
}

impl MarkerRecord {
    /// Whether the record carries at least the required field count.
    /// Short records are still returned by [`parse`]; acting on them is
    /// the decision layer's call.
    pub fn has_min_fields(&self) -> bool {
        self.fields.len() >= MIN_FIELDS
    }
}

/// Find and split the first marker record in `body`.
///
/// Entities are decoded before splitting so an encoded `&#59;` cannot
/// corrupt field boundaries. Returns `None` when no marker line exists.
pub fn parse(body: &str) -> Option<MarkerRecord> {
    let captures = marker_regex().captures(body)?;
    let raw_line = captures.get(0)?.as_str().to_string();
    let decoded = decode_entities(captures.get(1)?.as_str());
    let fields = decoded.split(';').map(str::to_string).collect();

    Some(MarkerRecord {
        raw_line,
        decoded,
        fields,
    })
}

/// Rebuild a marker line from a field list, in decoded (human-readable)
/// form
pub fn rebuild_line(fields: &[String]) -> String {
    format!("{}-{}-{}", START_SENTINEL, fields.join(";"), END_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_eleven_fields() {
        let body = "Intro text\nMusliStart-a;b;c;d;e;f;g;h;i;j;k-MusliEnde\nOutro";
        let record = parse(body).unwrap();
        assert_eq!(record.raw_line, "MusliStart-a;b;c;d;e;f;g;h;i;j;k-MusliEnde");
        assert_eq!(
            record.fields,
            vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"]
        );
        assert!(record.has_min_fields());
    }

    #[test]
    fn test_parse_no_marker() {
        assert_eq!(parse("just a regular note body"), None);
        assert_eq!(parse("MusliStart- but never closed"), None);
    }

    #[test]
    fn test_parse_returns_short_records() {
        let record = parse("MusliStart-only;three;fields-MusliEnde").unwrap();
        assert_eq!(record.fields.len(), 3);
        assert!(!record.has_min_fields());
    }

    #[test]
    fn test_parse_first_marker_wins() {
        let body = "MusliStart-first;line-MusliEnde and MusliStart-second;line-MusliEnde";
        let record = parse(body).unwrap();
        assert_eq!(record.decoded, "first;line");
    }

    #[test]
    fn test_parse_decodes_before_splitting() {
        // Every entity ends in a semicolon; splitting the encoded text
        // would cut "K&ouml;ln" into "K&ouml" and "ln". Decoding first
        // keeps the field whole.
        let body = "MusliStart-K&ouml;ln;10115;Nordrhein-Westfalen-MusliEnde";
        let record = parse(body).unwrap();
        assert_eq!(record.fields, vec!["Köln", "10115", "Nordrhein-Westfalen"]);
        // The raw line keeps the encoded form for later replacement
        assert!(record.raw_line.contains("&ouml;"));
        assert!(!record.decoded.contains("&ouml;"));
    }

    #[test]
    fn test_parse_non_greedy_match() {
        let body = "MusliStart-a;b-MusliEnde trailing -MusliEnde";
        let record = parse(body).unwrap();
        assert_eq!(record.decoded, "a;b");
    }

    #[test]
    fn test_rebuild_round_trip() {
        let body = "x MusliStart-a;b;c;d;e;f;g;h;i;j;k-MusliEnde y";
        let mut record = parse(body).unwrap();
        record.fields[CITY_FIELD] = "München".to_string();
        let rebuilt = rebuild_line(&record.fields);
        assert_eq!(rebuilt, "MusliStart-a;b;c;d;e;f;g;h;München;j;k-MusliEnde");

        // The original raw line is still findable for in-place replacement
        assert!(body.contains(&record.raw_line));
        let updated = body.replacen(&record.raw_line, &rebuilt, 1);
        assert!(updated.contains("München"));
    }

    #[test]
    fn test_field_positions() {
        let record = parse("MusliStart-1;2;3;4;5;6;7;8;Berlin;10115;Berlin-MusliEnde").unwrap();
        assert_eq!(record.fields[CITY_FIELD], "Berlin");
        assert_eq!(record.fields[POSTAL_CODE_FIELD], "10115");
        assert_eq!(record.fields[STATE_FIELD], "Berlin");
    }
}
