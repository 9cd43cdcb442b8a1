//! Ordered alias lookups for fields whose name varies between endpoints.

use serde_json::{Map, Value};

/// First alias present in `map` with a non-null value.
pub fn first_present<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| map.get(*alias))
        .find(|value| !value.is_null())
}

/// First present alias rendered as text. Strings are taken as-is, numbers
/// are formatted; empty strings count as absent.
pub fn first_text(map: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|alias| match map.get(*alias)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .next()
}
