//! Utility functions for parsing, comparing and (de)serializing reservation data

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer, de};
use std::cmp::Ordering;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Naive layouts accepted after RFC 3339 has been tried; interpreted as UTC
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a reservation timestamp
///
/// Accepts RFC 3339 (`2024-05-01T09:30:00-05:00`), a naive date-time
/// (`2024-05-01T09:30`) or a bare date (`2024-05-01`). Values without an
/// offset are taken as UTC.
///
/// # Errors
///
/// Returns [`Error::InvalidDateTime`] when none of the layouts match.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::InvalidDateTime {
            value: value.to_string(),
        })
}

/// Leading-integer interpretation of a reservation code
///
/// Leading whitespace and one sign are skipped, then the longest run of ASCII
/// digits is read. Anything without leading digits (`"A"`, `""`) is `0`, so
/// `"12b"` orders as `12`. Runs too long for an `i64` saturate.
#[must_use]
pub fn parse_code_number(code: &str) -> i64 {
    let trimmed = code.trim_start();
    let (negative, rest) = trimmed
        .strip_prefix('-')
        .map_or_else(|| (false, trimmed.strip_prefix('+').unwrap_or(trimmed)), |rest| (true, rest));

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) if digits.is_empty() => 0,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Accent- and case-insensitive folding of `value`
#[must_use]
pub fn fold_text(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-style string comparison
///
/// Base letters decide first, then accents (unaccented first), then case
/// (lowercase first). Byte order is only the last resort.
#[must_use]
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    fold_text(a)
        .cmp(&fold_text(b))
        .then_with(|| {
            let accents = |s: &str| s.nfd().flat_map(char::to_lowercase).collect::<String>();
            accents(a).cmp(&accents(b))
        })
        .then_with(|| {
            let case = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();
            case(a).cmp(&case(b))
        })
        .then_with(|| a.cmp(b))
}

/// Deserialize a value that may be `null` into its `Default`
///
/// # Errors
///
/// Propagates the inner deserializer's error.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a reservation code sent either as a JSON string or number
///
/// # Errors
///
/// Fails when the value is neither a string nor a number.
pub fn deserialize_code<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawCode::deserialize(deserializer)? {
        RawCode::Text(text) => text,
        RawCode::Integer(number) => number.to_string(),
        RawCode::Float(number) => number.to_string(),
    })
}

/// Serde adapter for timestamps emitted as RFC 3339 and read leniently
pub mod lenient_datetime {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc, de, parse_datetime};

    /// Serialize as RFC 3339
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error.
    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    /// Deserialize with [`parse_datetime`]
    ///
    /// # Errors
    ///
    /// Fails when the string matches none of the accepted layouts.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_datetime(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("42", 42)]
    #[case("  7", 7)]
    #[case("12b", 12)]
    #[case("-3", -3)]
    #[case("+9", 9)]
    #[case("A", 0)]
    #[case("", 0)]
    #[case("-", 0)]
    #[case("99999999999999999999999", i64::MAX)]
    #[case("-99999999999999999999999", i64::MIN)]
    #[case("-9223372036854775808", i64::MIN)]
    fn test_parse_code_number(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(parse_code_number(input), expected);
    }

    #[test]
    fn test_parse_datetime_rfc3339_is_normalized_to_utc() {
        let parsed = parse_datetime("2024-05-01T09:30:00-05:00").unwrap();
        assert_eq!(parsed.hour(), 14);
        assert_eq!(parsed.minute(), 30);
    }

    #[rstest]
    #[case("2024-05-01T09:30")]
    #[case("2024-05-01T09:30:00")]
    #[case("2024-05-01T09:30:00.250")]
    #[case("2024-05-01 09:30")]
    fn test_parse_datetime_naive_layouts(#[case] input: &str) {
        let parsed = parse_datetime(input).unwrap();
        assert_eq!(parsed.day(), 1);
        assert_eq!(parsed.hour(), 9);
    }

    #[test]
    fn test_parse_datetime_bare_date_is_midnight() {
        let parsed = parse_datetime("2024-12-24").unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.month(), 12);
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        let err = parse_datetime("tomorrow").unwrap_err();
        assert!(matches!(err, Error::InvalidDateTime { .. }));
    }

    #[test]
    fn test_fold_text_strips_accents_and_case() {
        assert_eq!(fold_text("Muñoz ÉLAN"), "munoz elan");
    }

    #[test]
    fn test_locale_compare_orders_letters_before_case() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zoe", "ana"), Ordering::Greater);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("e", "é"), Ordering::Less);
        assert_eq!(locale_compare("élan", "ember"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }
}
