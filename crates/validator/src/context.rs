//! Per-field transient context and the size contract.
//!
//! `FieldContext` is the scoped replacement for the original design's
//! untyped per-field "memory" map: it records the boolean facts earlier
//! rules in the same chain have established, and nothing else. A fresh
//! context is created when a field's chain starts and dropped when it ends.

use serde_json::Value;

use crate::value;

/// Facts established by earlier rules in one field's chain.
///
/// Both facts are write-once sticky: once a rule establishes them they stay
/// set for the remainder of the chain, regardless of what later rules do.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldContext {
    numeric: bool,
    integer: bool,
}

impl FieldContext {
    /// Records that a rule has established the value as numeric.
    pub fn establish_numeric(&mut self) {
        self.numeric = true;
    }

    /// Records that a rule has established the value as an integer.
    /// An integer is also numeric.
    pub fn establish_integer(&mut self) {
        self.integer = true;
        self.numeric = true;
    }

    /// Whether the chain has established the value as numeric.
    #[must_use]
    pub fn numeric_established(&self) -> bool {
        self.numeric
    }

    /// Whether the chain has established the value as an integer.
    #[must_use]
    pub fn integer_established(&self) -> bool {
        self.integer
    }
}

/// The "size" of a value, as consumed by `size`/`min`/`max`/`between` and
/// the comparison rules.
///
/// - JSON numbers are their own magnitude.
/// - Arrays and objects are their element count.
/// - Strings are their character count, unless `numeric` is set and the
///   string parses as a number, in which case the parsed magnitude wins.
/// - Booleans and null have no size.
///
/// The `numeric` flag is true when the field's chain declares a
/// numeric-establishing rule and either that rule already ran or the raw
/// value sniffs numeric; this is what makes `numeric|min:5` and
/// `min:5|numeric` agree.
pub(crate) fn value_size(value: &Value, numeric: bool) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            if numeric {
                if let Some(magnitude) = value::as_number(value) {
                    return Some(magnitude);
                }
            }
            Some(s.chars().count() as f64)
        }
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
        Value::Bool(_) | Value::Null => None,
    }
}
