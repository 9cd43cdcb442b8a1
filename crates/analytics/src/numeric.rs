//! Total parsing of locale-formatted numbers.
//!
//! The Seller API returns money both as JSON numbers and as text such as
//! `"1 234,50"` (space or NBSP thousands separator, comma decimal point).
//! `parse_number` never fails: anything it cannot read is `0.0`. That
//! sentinel is fine for summary display and wrong for exact accounting;
//! callers that must tell "absent" from "malformed" use `try_parse_number`.

use serde_json::Value;

/// Characters dropped before parsing: ASCII space, NBSP, narrow NBSP.
const GROUP_SEPARATORS: [char; 3] = [' ', '\u{a0}', '\u{202f}'];

fn parse_text(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !GROUP_SEPARATORS.contains(c))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Parse a JSON value as a finite number, or `None`.
pub fn try_parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_text(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parse a JSON value as a number; `0.0` for null, garbage, or non-finite.
pub fn parse_number(value: &Value) -> f64 {
    try_parse_number(value).unwrap_or(0.0)
}

/// `parse_number` for raw text.
pub fn parse_number_str(raw: &str) -> f64 {
    parse_text(raw).filter(|v| v.is_finite()).unwrap_or(0.0)
}
