//! Loose-typed helpers over `serde_json::Value`.
//!
//! The engine treats values the way a form decoder delivers them: numbers
//! may arrive as strings, booleans as `"1"`/`"0"`, and emptiness is a
//! semantic notion (blank string, empty array) rather than a type.

use serde_json::Value;

/// Renders a value the way it would appear in a message or a loose
/// comparison. Strings are unquoted; compound values use JSON syntax.
pub(crate) fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// A value is "empty" if it is null, a blank (or whitespace-only) string,
/// or a zero-length array or object. Numbers and booleans are never empty;
/// `0` and `false` are present values.
pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) | Value::Bool(_) => false,
    }
}

/// Numeric reading of a value: JSON numbers directly, strings via parsing.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integer reading of a value: JSON integers directly, strings via parsing.
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Loose equality: structural equality first, falling back to comparing the
/// display renderings so `"25"` and `25` agree the way form input expects.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    a == b || display(a) == display(b)
}
