//! Presence, prohibition and acceptance rules. All of these are implicit
//! except `filled` and `prohibits`: presence is exactly what they judge, so
//! they must run even when the field is absent.
//!
//! Trigger-field variants (`required_if`, `missing_unless`, ...) are
//! default-permissive: when the trigger field is absent from the record the
//! condition is not applicable and the rule passes.

use crate::registry::Registry;
use crate::rule::Check;
use crate::value;

use super::{at_least, join, text_param, Predicate};

pub(crate) fn install(registry: &mut Registry) {
    registry.register("required", |_, _| {
        Ok(Predicate::implicit(
            "required",
            "The :attribute field is required.",
            has_value,
        ))
    });

    registry.register("required_if", |_, params| {
        at_least(params, 2, "trigger field and value")?;
        let other = text_param(params, 0, "trigger field")?;
        let expected = params[1..].to_vec();
        let template = format!(
            "The :attribute field is required when {other} is {}.",
            join(&expected)
        );
        Ok(Predicate::implicit(
            "required_if",
            template,
            move |check| match trigger_matches(check, &other, &expected) {
                Some(true) => has_value(check),
                _ => true,
            },
        ))
    });

    registry.register("required_unless", |_, params| {
        at_least(params, 2, "trigger field and value")?;
        let other = text_param(params, 0, "trigger field")?;
        let expected = params[1..].to_vec();
        let template = format!(
            "The :attribute field is required unless {other} is in {}.",
            join(&expected)
        );
        Ok(Predicate::implicit(
            "required_unless",
            template,
            move |check| match trigger_matches(check, &other, &expected) {
                Some(false) => has_value(check),
                _ => true,
            },
        ))
    });

    registry.register("required_with", |_, params| {
        at_least(params, 1, "sibling field")?;
        let others = params.to_vec();
        let template = format!(
            "The :attribute field is required when {} is present.",
            join(&others)
        );
        Ok(Predicate::implicit("required_with", template, move |check| {
            if others.iter().any(|f| check.is_present(f)) {
                has_value(check)
            } else {
                true
            }
        }))
    });

    registry.register("required_with_all", |_, params| {
        at_least(params, 1, "sibling field")?;
        let others = params.to_vec();
        let template = format!(
            "The :attribute field is required when {} are present.",
            join(&others)
        );
        Ok(Predicate::implicit(
            "required_with_all",
            template,
            move |check| {
                if others.iter().all(|f| check.is_present(f)) {
                    has_value(check)
                } else {
                    true
                }
            },
        ))
    });

    registry.register("required_without", |_, params| {
        at_least(params, 1, "sibling field")?;
        let others = params.to_vec();
        let template = format!(
            "The :attribute field is required when {} is not present.",
            join(&others)
        );
        Ok(Predicate::implicit(
            "required_without",
            template,
            move |check| {
                if others.iter().any(|f| !check.is_present(f)) {
                    has_value(check)
                } else {
                    true
                }
            },
        ))
    });

    registry.register("required_without_all", |_, params| {
        at_least(params, 1, "sibling field")?;
        let others = params.to_vec();
        let template = format!(
            "The :attribute field is required when none of {} are present.",
            join(&others)
        );
        Ok(Predicate::implicit(
            "required_without_all",
            template,
            move |check| {
                if others.iter().all(|f| !check.is_present(f)) {
                    has_value(check)
                } else {
                    true
                }
            },
        ))
    });

    registry.register("filled", |_, _| {
        Ok(Predicate::new(
            "filled",
            "The :attribute field must have a value.",
            has_value,
        ))
    });

    registry.register("present", |_, _| {
        Ok(Predicate::implicit(
            "present",
            "The :attribute field must be present.",
            |check| check.value().is_some(),
        ))
    });

    registry.register("present_if", |_, params| {
        at_least(params, 2, "trigger field and value")?;
        let other = text_param(params, 0, "trigger field")?;
        let expected = params[1..].to_vec();
        let template = format!(
            "The :attribute field must be present when {other} is {}.",
            join(&expected)
        );
        Ok(Predicate::implicit("present_if", template, move |check| {
            match trigger_matches(check, &other, &expected) {
                Some(true) => check.value().is_some(),
                _ => true,
            }
        }))
    });

    registry.register("present_unless", |_, params| {
        at_least(params, 2, "trigger field and value")?;
        let other = text_param(params, 0, "trigger field")?;
        let expected = params[1..].to_vec();
        let template = format!(
            "The :attribute field must be present unless {other} is in {}.",
            join(&expected)
        );
        Ok(Predicate::implicit(
            "present_unless",
            template,
            move |check| match trigger_matches(check, &other, &expected) {
                Some(false) => check.value().is_some(),
                _ => true,
            },
        ))
    });

    registry.register("present_with", |_, params| {
        at_least(params, 1, "sibling field")?;
        let others = params.to_vec();
        let template = format!(
            "The :attribute field must be present when {} is present.",
            join(&others)
        );
        Ok(Predicate::implicit("present_with", template, move |check| {
            if others.iter().any(|f| check.is_present(f)) {
                check.value().is_some()
            } else {
                true
            }
        }))
    });

    registry.register("missing", |_, _| {
        Ok(Predicate::implicit(
            "missing",
            "The :attribute field must be missing.",
            |check| check.value().is_none(),
        ))
    });

    registry.register("missing_if", |_, params| {
        at_least(params, 2, "trigger field and value")?;
        let other = text_param(params, 0, "trigger field")?;
        let expected = params[1..].to_vec();
        let template = format!(
            "The :attribute field must be missing when {other} is {}.",
            join(&expected)
        );
        Ok(Predicate::implicit("missing_if", template, move |check| {
            match trigger_matches(check, &other, &expected) {
                Some(true) => check.value().is_none(),
                _ => true,
            }
        }))
    });

    registry.register("missing_unless", |_, params| {
        at_least(params, 2, "trigger field and value")?;
        let other = text_param(params, 0, "trigger field")?;
        let expected = params[1..].to_vec();
        let template = format!(
            "The :attribute field must be missing unless {other} is in {}.",
            join(&expected)
        );
        Ok(Predicate::implicit(
            "missing_unless",
            template,
            move |check| match trigger_matches(check, &other, &expected) {
                Some(false) => check.value().is_none(),
                _ => true,
            },
        ))
    });

    registry.register("missing_with", |_, params| {
        at_least(params, 1, "sibling field")?;
        let others = params.to_vec();
        let template = format!(
            "The :attribute field must be missing when {} is present.",
            join(&others)
        );
        Ok(Predicate::implicit("missing_with", template, move |check| {
            if others.iter().any(|f| check.is_present(f)) {
                check.value().is_none()
            } else {
                true
            }
        }))
    });

    registry.register("prohibited", |_, _| {
        Ok(Predicate::implicit(
            "prohibited",
            "The :attribute field is prohibited.",
            |check| !has_value(check),
        ))
    });

    registry.register("prohibited_if", |_, params| {
        at_least(params, 2, "trigger field and value")?;
        let other = text_param(params, 0, "trigger field")?;
        let expected = params[1..].to_vec();
        let template = format!(
            "The :attribute field is prohibited when {other} is {}.",
            join(&expected)
        );
        Ok(Predicate::implicit(
            "prohibited_if",
            template,
            move |check| match trigger_matches(check, &other, &expected) {
                Some(true) => !has_value(check),
                _ => true,
            },
        ))
    });

    registry.register("prohibited_unless", |_, params| {
        at_least(params, 2, "trigger field and value")?;
        let other = text_param(params, 0, "trigger field")?;
        let expected = params[1..].to_vec();
        let template = format!(
            "The :attribute field is prohibited unless {other} is in {}.",
            join(&expected)
        );
        Ok(Predicate::implicit(
            "prohibited_unless",
            template,
            move |check| match trigger_matches(check, &other, &expected) {
                Some(false) => !has_value(check),
                _ => true,
            },
        ))
    });

    registry.register("prohibits", |_, params| {
        at_least(params, 1, "prohibited field")?;
        let others = params.to_vec();
        let template = format!(
            "The :attribute field prohibits {} from being present.",
            join(&others)
        );
        Ok(Predicate::new("prohibits", template, move |check| {
            if has_value(check) {
                others
                    .iter()
                    .all(|f| check.other(f).is_none_or(value::is_empty))
            } else {
                true
            }
        }))
    });

    registry.register("accepted", |_, _| {
        Ok(Predicate::implicit(
            "accepted",
            "The :attribute must be accepted.",
            is_accepted,
        ))
    });

    registry.register("accepted_if", |_, params| {
        at_least(params, 2, "trigger field and value")?;
        let other = text_param(params, 0, "trigger field")?;
        let expected = params[1..].to_vec();
        let template = format!(
            "The :attribute must be accepted when {other} is {}.",
            join(&expected)
        );
        Ok(Predicate::implicit("accepted_if", template, move |check| {
            match trigger_matches(check, &other, &expected) {
                Some(true) => is_accepted(check),
                _ => true,
            }
        }))
    });

    registry.register("declined", |_, _| {
        Ok(Predicate::implicit(
            "declined",
            "The :attribute must be declined.",
            is_declined,
        ))
    });

    registry.register("declined_if", |_, params| {
        at_least(params, 2, "trigger field and value")?;
        let other = text_param(params, 0, "trigger field")?;
        let expected = params[1..].to_vec();
        let template = format!(
            "The :attribute must be declined when {other} is {}.",
            join(&expected)
        );
        Ok(Predicate::implicit("declined_if", template, move |check| {
            match trigger_matches(check, &other, &expected) {
                Some(true) => is_declined(check),
                _ => true,
            }
        }))
    });
}

/// Present with a non-empty value.
fn has_value(check: &mut Check<'_>) -> bool {
    check.value().is_some_and(|v| !value::is_empty(v))
}

/// Whether the trigger field's value matches one of the expected renderings.
/// `None` when the trigger field is absent.
fn trigger_matches(check: &Check<'_>, other: &str, expected: &[String]) -> Option<bool> {
    let actual = value::display(check.other(other)?);
    Some(expected.iter().any(|e| *e == actual))
}

fn is_accepted(check: &mut Check<'_>) -> bool {
    check.value().is_some_and(|v| {
        matches!(
            value::display(v).to_lowercase().as_str(),
            "yes" | "on" | "1" | "true"
        )
    })
}

fn is_declined(check: &mut Check<'_>) -> bool {
    check.value().is_some_and(|v| {
        matches!(
            value::display(v).to_lowercase().as_str(),
            "no" | "off" | "0" | "false"
        )
    })
}
