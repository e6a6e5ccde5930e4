//! Lenient field extraction for event payloads.
//!
//! Controllers are small hand-written web pages, so the host never rejects an
//! event because one field is missing or has the wrong JSON type.  Instead
//! every field falls back to a *neutral* value:
//!
//! | Field kind | Accepted                        | Anything else becomes |
//! |------------|---------------------------------|-----------------------|
//! | number     | JSON number, numeric string     | `0.0`                 |
//! | string     | JSON string, JSON number (text) | `""`                  |
//! | key list   | array of strings, `"ctrl+c"`    | `[]`                  |
//!
//! All helpers take the whole `data` value.  `Value::get` returns `None` when
//! `data` is not an object, so a `null` or array payload degrades to "every
//! field missing" without a special case.

use serde_json::Value;

/// Reads a numeric field, returning `0.0` when missing, malformed, or non-finite.
pub fn number_field(data: &Value, name: &str) -> f64 {
    data.get(name).map_or(0.0, number_or_zero)
}

/// Converts a single JSON value into a finite `f64`, or `0.0`.
pub fn number_or_zero(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Reads a string field, returning `""` when missing or malformed.
///
/// JSON numbers are rendered to text so `{"key": 5}` still means the `5` key.
pub fn string_field(data: &Value, name: &str) -> String {
    data.get(name).map(text_or_empty).unwrap_or_default()
}

/// Like [`string_field`] but with a caller-chosen default for a *missing*
/// field.  A present-but-malformed field still becomes `""`.
pub fn string_field_or(data: &Value, name: &str, default: &str) -> String {
    match data.get(name) {
        None | Some(Value::Null) => default.to_string(),
        Some(value) => text_or_empty(value),
    }
}

fn text_or_empty(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Reads a list of key names.
///
/// Accepts a JSON array (non-text entries are dropped) or a single string in
/// the `"ctrl+shift+t"` form.  In the string form the plus key itself is a
/// `+` between separators: `"+"`, `"ctrl++"` and `"ctrl+++t"` all name it.
pub fn string_list_field(data: &Value, name: &str) -> Vec<String> {
    match data.get(name) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| matches!(item, Value::String(_) | Value::Number(_)))
            .map(text_or_empty)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => split_plus_notation(s),
        _ => Vec::new(),
    }
}

/// Splits `"ctrl+shift+t"` into names.  Two empty segments in a row are what
/// a literal `+` leaves behind, so they become one `"+"`; a lone empty
/// segment (a leading or trailing separator) is dropped.
fn split_plus_notation(s: &str) -> Vec<String> {
    let parts: Vec<&str> = s.split('+').map(str::trim).collect();
    let mut names = Vec::with_capacity(parts.len());
    let mut i = 0;
    while i < parts.len() {
        let part = parts[i];
        if !part.is_empty() {
            names.push(part.to_string());
        } else if parts.get(i + 1).is_some_and(|next| next.is_empty()) {
            names.push("+".to_string());
            i += 1;
        }
        i += 1;
    }
    names
}

// ── Tests ─────────────────────────────────────────────────────────────────────
