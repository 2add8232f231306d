//! Type-shape rules. Values arrive form-decoded, so the numeric checks
//! accept both JSON numbers and numeric strings; chains declaring one of
//! these switch the sizing contract to magnitude (see the engine).

use serde_json::Value;

use crate::registry::Registry;
use crate::value;

use super::{count_param, fmt_num, number_param, Predicate};

pub(crate) fn install(registry: &mut Registry) {
    registry.register("string", |_, _| {
        Ok(Predicate::new(
            "string",
            "The :attribute must be a string.",
            |check| matches!(check.value(), Some(Value::String(_))),
        ))
    });

    registry.register("integer", |_, _| Ok(integer_rule("integer")));
    registry.register("int", |_, _| Ok(integer_rule("int")));

    registry.register("numeric", |_, _| {
        Ok(Predicate::new(
            "numeric",
            "The :attribute must be a number.",
            |check| check.value().is_some_and(|v| value::as_number(v).is_some()),
        ))
    });

    registry.register("decimal", |_, params| {
        let min = count_param(params, 0, "decimal place count")?;
        let (max, bound) = match params.get(1) {
            Some(_) => {
                let max = count_param(params, 1, "maximum decimal place count")?;
                (max, format!("{min} to {max}"))
            }
            None => (min, min.to_string()),
        };
        let template = format!("The :attribute must have {bound} decimal places.");
        Ok(Predicate::new("decimal", template, move |check| {
            check
                .value()
                .is_some_and(|v| decimal_places(v).is_some_and(|n| n >= min && n <= max))
        }))
    });

    registry.register("boolean", |_, _| {
        Ok(Predicate::new(
            "boolean",
            "The :attribute field must be true or false.",
            |check| {
                check.value().is_some_and(|v| match v {
                    Value::Bool(_) => true,
                    Value::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
                    Value::String(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
                    _ => false,
                })
            },
        ))
    });

    registry.register("array", |_, _| {
        Ok(Predicate::new(
            "array",
            "The :attribute must be an array.",
            |check| matches!(check.value(), Some(Value::Array(_))),
        ))
    });

    registry.register("json", |_, _| {
        Ok(Predicate::new(
            "json",
            "The :attribute must be a valid JSON string.",
            |check| {
                matches!(check.value(), Some(Value::String(s))
                    if serde_json::from_str::<Value>(s).is_ok())
            },
        ))
    });

    registry.register("digits", |_, params| {
        let n = count_param(params, 0, "digit count")?;
        let template = format!("The :attribute must be {n} digits.");
        Ok(Predicate::new("digits", template, move |check| {
            check.value().is_some_and(|v| digit_count(v) == Some(n))
        }))
    });

    registry.register("digits_between", |_, params| {
        let min = count_param(params, 0, "minimum digit count")?;
        let max = count_param(params, 1, "maximum digit count")?;
        let template = format!("The :attribute must be between {min} and {max} digits.");
        Ok(Predicate::new("digits_between", template, move |check| {
            check
                .value()
                .is_some_and(|v| digit_count(v).is_some_and(|n| n >= min && n <= max))
        }))
    });

    registry.register("min_digits", |_, params| {
        let min = count_param(params, 0, "minimum digit count")?;
        let template = format!("The :attribute must have at least {min} digits.");
        Ok(Predicate::new("min_digits", template, move |check| {
            check
                .value()
                .is_some_and(|v| digit_count(v).is_some_and(|n| n >= min))
        }))
    });

    registry.register("max_digits", |_, params| {
        let max = count_param(params, 0, "maximum digit count")?;
        let template = format!("The :attribute must not have more than {max} digits.");
        Ok(Predicate::new("max_digits", template, move |check| {
            check
                .value()
                .is_some_and(|v| digit_count(v).is_some_and(|n| n <= max))
        }))
    });

    registry.register("multiple_of", |_, params| {
        let step = number_param(params, 0, "step")?;
        if step == 0.0 {
            return Err(crate::error::ParamError::new("step must not be zero"));
        }
        let template = format!("The :attribute must be a multiple of {}.", fmt_num(step));
        Ok(Predicate::new("multiple_of", template, move |check| {
            check.value().is_some_and(|v| {
                value::as_number(v).is_some_and(|n| {
                    let ratio = n / step;
                    (ratio - ratio.round()).abs() < 1e-9
                })
            })
        }))
    });
}

fn integer_rule(name: &'static str) -> Box<dyn crate::rule::Rule> {
    Predicate::new(name, "The :attribute must be an integer.", |check| {
        check.value().is_some_and(|v| value::as_integer(v).is_some())
    })
}

/// Digit count of an all-digit rendering; `None` for signed, fractional or
/// non-numeric values.
fn digit_count(value: &Value) -> Option<usize> {
    let text = value::display(value);
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        Some(text.len())
    } else {
        None
    }
}

/// Fraction-digit count of a plain decimal rendering; `None` when the value
/// is not a number written in plain (non-scientific) notation.
fn decimal_places(value: &Value) -> Option<usize> {
    let text = value::display(value);
    let unsigned = text.strip_prefix('-').unwrap_or(&text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    let plain = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !plain(whole) || !plain(fraction) {
        return None;
    }
    Some(fraction.len())
}
