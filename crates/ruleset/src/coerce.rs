//! Loose scalar coercions shared by the built-in rules.
//!
//! Request data arrives as strings more often than as typed numbers, so
//! numeric checks and rule arguments accept both forms.

use serde_json::Value;

/// Parses a numeric string: optional surrounding whitespace, optional sign,
/// digits with an optional fraction, optional exponent.
///
/// Spellings such as `inf`, `NaN` or hex literals are rejected even though
/// `f64::from_str` would take some of them.
pub(crate) fn parse_numeric_str(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let body = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if digits.is_empty() || !all_digits(digits) {
            return None;
        }
    }

    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric view of a value: JSON numbers and numeric strings.
pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// Integral view of a value, for counts and lengths.
///
/// Floats and numeric strings are accepted only when they carry no
/// fractional part.
pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_numeric_str(s)
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64),
        _ => None,
    }
}

/// Loose truthiness used by flag-like arguments (`empty`, `ipv6`).
///
/// `null`, `false`, `0`, `""`, `"0"` and empty containers are falsy.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Loose equality used by the `in` rule.
///
/// Numbers compare numerically with numbers and with numeric strings, so
/// `1`, `1.0` and `"1"` are all equal; everything else compares
/// structurally.
pub(crate) fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_) | Value::String(_))
        | (Value::String(_), Value::Number(_)) => match (as_f64(left), as_f64(right)) {
            (Some(a), Some(b)) => a == b,
            _ => left == right,
        },
        _ => left == right,
    }
}
