//! Value type coercion: upgrade exiftool's string values to typed primitives.

use regex::Regex;
use std::sync::OnceLock;

use crate::value::{MetadataMap, TagValue};

fn float_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A fractional or exponent part is required — plain integers are not
    // floats here, they fall through to the int probe.
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.\d*|\.\d+|\d+(?:\.\d+)?[eE][+-]?\d+)$").unwrap()
    })
}

fn int_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?\d+$").unwrap())
}

fn datetime_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // exiftool's native form delimits the date with colons.
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[:-](\d{2})[:-](\d{2}) (\d{2}:\d{2}:\d{2})$").unwrap()
    })
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})[:-](\d{2})[:-](\d{2})$").unwrap())
}

/// Coerce a raw string value to a typed primitive where it matches.
///
/// Probe order: bool, float, int, datetime, date; non-matches stay strings.
/// Date and datetime matching is purely textual — no calendar validation —
/// because exiftool happily emits timestamps like `2018:02:29 01:28:10` that
/// still need to round-trip. The colon-delimited date portion is normalized
/// to the hyphenated ISO form.
pub fn coerce(raw: &str) -> TagValue {
    match raw.to_lowercase().as_str() {
        "true" | "yes" => return TagValue::Bool(true),
        "false" | "no" => return TagValue::Bool(false),
        _ => {}
    }

    if float_re().is_match(raw) {
        if let Ok(f) = raw.parse::<f64>() {
            return TagValue::Float(f);
        }
    }

    if int_re().is_match(raw) {
        if let Ok(i) = raw.parse::<i64>() {
            return TagValue::Int(i);
        }
        // Magnitude beyond i64 — keep the text.
        return TagValue::Str(raw.to_string());
    }

    if let Some(caps) = datetime_re().captures(raw) {
        return TagValue::DateTime(format!("{}-{}-{} {}", &caps[1], &caps[2], &caps[3], &caps[4]));
    }

    if let Some(caps) = date_re().captures(raw) {
        return TagValue::Date(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]));
    }

    TagValue::Str(raw.to_string())
}

/// Apply [`coerce`] to every string leaf in an extracted metadata map,
/// descending through lists and nested maps.
pub fn clean_values(metadata: MetadataMap) -> MetadataMap {
    metadata
        .into_iter()
        .map(|(path, record)| {
            let record = record
                .into_iter()
                .map(|(key, value)| (key, coerce_value(value)))
                .collect();
            (path, record)
        })
        .collect()
}

fn coerce_value(value: TagValue) -> TagValue {
    match value {
        TagValue::Str(s) => coerce(&s),
        TagValue::List(items) => TagValue::List(items.into_iter().map(coerce_value).collect()),
        TagValue::Map(entries) => TagValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k, coerce_value(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── probe priority ───────────────────────────────────────────────

    #[test]
    fn integers_with_optional_sign() {
        assert_eq!(coerce("7"), TagValue::Int(7));
        assert_eq!(coerce("+7"), TagValue::Int(7));
        assert_eq!(coerce("-7"), TagValue::Int(-7));
        assert_eq!(coerce("0400"), TagValue::Int(400));
    }

    #[test]
    fn floats_require_fraction_or_exponent() {
        assert_eq!(coerce("11.11"), TagValue::Float(11.11));
        assert_eq!(coerce("-0.5"), TagValue::Float(-0.5));
        assert_eq!(coerce("1.5e3"), TagValue::Float(1500.0));
        assert_eq!(coerce("2e8"), TagValue::Float(2e8));
        // No fractional part: int wins.
        assert_eq!(coerce("42"), TagValue::Int(42));
    }

    #[test]
    fn booleans_case_insensitive() {
        assert_eq!(coerce("true"), TagValue::Bool(true));
        assert_eq!(coerce("TRUE"), TagValue::Bool(true));
        assert_eq!(coerce("Yes"), TagValue::Bool(true));
        assert_eq!(coerce("no"), TagValue::Bool(false));
    }

    #[test]
    fn exiftool_datetime_normalizes_to_hyphens() {
        assert_eq!(
            coerce("2018:02:29 01:28:10"),
            TagValue::DateTime("2018-02-29 01:28:10".into())
        );
    }

    #[test]
    fn hyphenated_datetime_accepted_unchanged() {
        assert_eq!(
            coerce("2018-02-29 01:28:10"),
            TagValue::DateTime("2018-02-29 01:28:10".into())
        );
    }

    #[test]
    fn bare_dates() {
        assert_eq!(coerce("2021:07:04"), TagValue::Date("2021-07-04".into()));
        assert_eq!(coerce("2021-07-04"), TagValue::Date("2021-07-04".into()));
    }

    #[test]
    fn non_matches_stay_strings() {
        assert_eq!(coerce("hello"), TagValue::Str("hello".into()));
        assert_eq!(coerce("1/250"), TagValue::Str("1/250".into()));
        assert_eq!(coerce("24.0 mm"), TagValue::Str("24.0 mm".into()));
        // Timezone suffix falls outside the pattern.
        assert_eq!(
            coerce("2018:02:20 01:28:10+02:00"),
            TagValue::Str("2018:02:20 01:28:10+02:00".into())
        );
    }

    #[test]
    fn huge_digit_strings_stay_strings() {
        let raw = "999999999999999999999999999";
        assert_eq!(coerce(raw), TagValue::Str(raw.into()));
    }

    // ── map traversal ────────────────────────────────────────────────

    #[test]
    fn clean_values_descends_into_lists() {
        let mut record = crate::value::TagMap::new();
        record.insert(
            "Subject".to_string(),
            TagValue::List(vec![TagValue::Str("7".into()), TagValue::Str("beach".into())]),
        );
        record.insert("ISO".to_string(), TagValue::Str("400".into()));

        let mut metadata = MetadataMap::new();
        metadata.insert("/p/a.jpg".to_string(), record);

        let cleaned = clean_values(metadata);
        let record = &cleaned["/p/a.jpg"];
        assert_eq!(record.get("ISO"), Some(&TagValue::Int(400)));
        assert_eq!(
            record.get("Subject"),
            Some(&TagValue::List(vec![
                TagValue::Int(7),
                TagValue::Str("beach".into()),
            ]))
        );
    }

    #[test]
    fn already_typed_values_pass_through() {
        let mut record = crate::value::TagMap::new();
        record.insert("Rating".to_string(), TagValue::Int(5));
        let mut metadata = MetadataMap::new();
        metadata.insert("/p/a.jpg".to_string(), record);

        let cleaned = clean_values(metadata);
        assert_eq!(cleaned["/p/a.jpg"].get("Rating"), Some(&TagValue::Int(5)));
    }
}
