//! HTML entity decoding for marker-line content
//!
//! Note bodies arrive HTML-ish; an encoded `&#59;` would otherwise be
//! split as a field delimiter, so decoding must run before any field
//! handling. The decoder is a single left-to-right pass: named entities
//! from a fixed table, decimal (`&#228;`) and hexadecimal (`&#xE4;`)
//! character references. Unknown entities are kept literally.

/// Named entities seen in note bodies: the XML core set plus the German
/// repertoire.
const NAMED_ENTITIES: [(&str, char); 16] = [
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("auml", 'ä'),
    ("ouml", 'ö'),
    ("uuml", 'ü'),
    ("Auml", 'Ä'),
    ("Ouml", 'Ö'),
    ("Uuml", 'Ü'),
    ("szlig", 'ß'),
    ("eacute", 'é'),
    ("egrave", 'è'),
    ("agrave", 'à'),
];

/// Longest entity name we accept between `&` and `;`
const MAX_ENTITY_LEN: usize = 8;

/// Decode named and numeric HTML entities in `input`
pub fn decode_entities(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match decode_one(candidate) {
            Some((decoded, consumed)) => {
                output.push(decoded);
                rest = &candidate[consumed..];
            }
            None => {
                output.push('&');
                rest = &candidate[1..];
            }
        }
    }

    output.push_str(rest);
    output
}

/// Try to decode a single entity at the start of `input` (which begins
/// with `&`). Returns the decoded character and the byte length consumed.
fn decode_one(input: &str) -> Option<(char, usize)> {
    let semicolon = input.find(';')?;
    if semicolon < 2 || semicolon > MAX_ENTITY_LEN + 1 {
        return None;
    }
    let name = &input[1..semicolon];
    let consumed = semicolon + 1;

    if let Some(rest) = name.strip_prefix('#') {
        let code = if let Some(hex) = rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            rest.parse::<u32>().ok()?
        };
        return char::from_u32(code).map(|c| (c, consumed));
    }

    NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, c)| (*c, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_entities() {
        assert_eq!(decode_entities("K&ouml;ln"), "Köln");
        assert_eq!(decode_entities("M&uuml;nchen &amp; Umgebung"), "München & Umgebung");
        assert_eq!(decode_entities("Stra&szlig;e"), "Straße");
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(decode_entities("&#228;"), "ä");
        assert_eq!(decode_entities("&#xE4;"), "ä");
        assert_eq!(decode_entities("&#59;"), ";");
    }

    #[test]
    fn test_unknown_entities_kept_literally() {
        assert_eq!(decode_entities("&unknown; &x"), "&unknown; &x");
        assert_eq!(decode_entities("50 &amp 50"), "50 &amp 50");
    }

    #[test]
    fn test_no_double_decoding() {
        // "&amp;auml;" decodes to the literal text "&auml;", not to "ä"
        assert_eq!(decode_entities("&amp;auml;"), "&auml;");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(decode_entities("Berlin;10115;Berlin"), "Berlin;10115;Berlin");
        assert_eq!(decode_entities(""), "");
    }

    #[test]
    fn test_invalid_numeric_reference() {
        assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
        assert_eq!(decode_entities("&#notanum;"), "&#notanum;");
    }
}
