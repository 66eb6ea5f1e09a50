//! Lenient readers for JSON fields that may be missing, null or mistyped.
//!
//! A logical field is described as an ordered list of `(key, transform)`
//! candidates; [`first_present`] returns the first one that yields a value.

use serde_json::{Map, Value};

/// Converts a raw JSON value into a field value, or rejects it.
pub type Transform<T> = fn(&Value) -> Option<T>;

/// Evaluate `candidates` in order and return the first accepted value.
///
/// A candidate is skipped when its key is missing, holds `null`, or its
/// transform returns `None`.
pub fn first_present<T>(obj: &Map<String, Value>, candidates: &[(&str, Transform<T>)]) -> Option<T> {
    candidates.iter().find_map(|(key, transform)| match obj.get(*key) {
        None | Some(Value::Null) => None,
        Some(value) => transform(value),
    })
}

/// Non-blank text. Numbers and booleans are rendered as text.
pub fn text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.trim().is_empty()).then_some(s)
}

/// Like [`text`], but the literal `"null"` some serializers emit counts as absent.
pub fn non_null_text(value: &Value) -> Option<String> {
    text(value).filter(|s| !s.trim().eq_ignore_ascii_case("null"))
}

/// Integer from an integral number or a numeric string.
pub fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Finite float from a number or a numeric string. NaN never gets through.
pub fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|f| f.is_finite())
}

/// The first of `keys` that holds an array.
pub fn array_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a [Value]> {
    keys.iter().find_map(|key| obj.get(*key).and_then(Value::as_array).map(Vec::as_slice))
}

/// Element `index` of an array, with `null` treated as missing.
pub fn element(values: &[Value], index: usize) -> Option<&Value> {
    values.get(index).filter(|v| !v.is_null())
}
