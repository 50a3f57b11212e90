//! Lenient readers for loosely-typed JSON payload fields

use serde_json::{Map, Value};

/// Read a number from a JSON number or a numeric string.
///
/// Strings may carry surrounding whitespace and a trailing `%`. Non-finite
/// results are rejected.
pub fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Read a non-negative integer count; anything unreadable or falsy is 0.
pub fn count(value: &Value) -> u64 {
    match number(value) {
        Some(n) if n > 0.0 => n.round() as u64,
        _ => 0,
    }
}

/// Value of the first key in `candidates` that is present and non-null.
pub fn first_present<'a>(record: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|v| !v.is_null())
}

/// Render a label-ish value as text.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
