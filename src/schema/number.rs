//! Serde helpers that write numbers the way the editor runtime reads them:
//! integral values without a fractional part, non-finite values as `null`.
//! Other floats use serde_json's own notation, so exponents are written
//! without a `+` sign (`1e21`).

use serde::{Deserialize, Deserializer, Serializer};

/// Largest integer an f64 represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        serializer.serialize_unit()
    } else if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Option::<f64>::deserialize(deserializer).map(|v| v.unwrap_or(f64::NAN))
}

/// Same rules for optional numbers; `None` is expected to be skipped.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Option::<f64>::deserialize(deserializer)
    }
}

/// Parses editor field text like JavaScript's `Number()` does: blank text is
/// zero, `Infinity` is accepted, `0x`/`0o`/`0b` prefixes select a radix, and
/// anything unparsable is NaN.
pub fn parse_field_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

/// Unsigned `0x`/`0o`/`0b` literals. Malformed digits are NaN.
fn parse_radix_literal(text: &str) -> Option<f64> {
    let prefix = text.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    });
    Some(value.unwrap_or(f64::NAN))
}

/// Parses the leading integer of `text` like JavaScript's `parseInt(text, 10)`.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_numbers_follow_editor_rules() {
        assert_eq!(parse_field_number(""), 0.0);
        assert_eq!(parse_field_number(" 10 "), 10.0);
        assert_eq!(parse_field_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(parse_field_number("1e3"), 1000.0);
        assert!(parse_field_number("ten").is_nan());
        assert!(parse_field_number("inf").is_nan());
    }

    #[test]
    fn radix_prefixes_are_honoured() {
        assert_eq!(parse_field_number("0x10"), 16.0);
        assert_eq!(parse_field_number("0XfF"), 255.0);
        assert_eq!(parse_field_number("0o17"), 15.0);
        assert_eq!(parse_field_number("0b101"), 5.0);
        assert!(parse_field_number("0x").is_nan());
        assert!(parse_field_number("0xZZ").is_nan());
        assert!(parse_field_number("-0x10").is_nan());
    }

    #[test]
    fn large_floats_keep_serde_json_notation() {
        #[derive(serde::Serialize)]
        struct Wrapper(#[serde(with = "crate::schema::number")] f64);
        assert_eq!(serde_json::to_string(&Wrapper(1e21)).unwrap(), "1e21");
        assert_eq!(serde_json::to_string(&Wrapper(2.5)).unwrap(), "2.5");
        assert_eq!(serde_json::to_string(&Wrapper(f64::INFINITY)).unwrap(), "null");
    }

    #[test]
    fn leading_int_ignores_trailing_garbage() {
        assert_eq!(parse_leading_int("230"), Some(230));
        assert_eq!(parse_leading_int(" 42deg"), Some(42));
        assert_eq!(parse_leading_int("-7"), Some(-7));
        assert_eq!(parse_leading_int("hue"), None);
        assert_eq!(parse_leading_int(""), None);
    }
}
