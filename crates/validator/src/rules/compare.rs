//! Relationship rules: equality with siblings, membership, distinctness.

use crate::error::ParamError;
use crate::registry::Registry;
use crate::rule::Check;
use crate::value;

use super::{at_least, join, text_param, Predicate};

pub(crate) fn install(registry: &mut Registry) {
    registry.register("same", |_, params| {
        let other = text_param(params, 0, "field to match")?;
        let template = format!("The :attribute and {other} must match.");
        Ok(Predicate::new("same", template, move |check| {
            match (check.value(), check.other(&other)) {
                (Some(own), Some(theirs)) => value::loose_eq(own, theirs),
                _ => false,
            }
        }))
    });

    registry.register("different", |_, params| {
        let other = text_param(params, 0, "field to differ from")?;
        let template = format!("The :attribute and {other} must be different.");
        Ok(Predicate::new("different", template, move |check| {
            match (check.value(), check.other(&other)) {
                (Some(own), Some(theirs)) => !value::loose_eq(own, theirs),
                _ => true,
            }
        }))
    });

    registry.register("confirmed", |_, params| {
        // An explicit confirmation field may be named; the default is the
        // `_confirmation` suffix convention.
        let suffix_field = params.first().filter(|p| !p.trim().is_empty()).cloned();
        Ok(Predicate::new(
            "confirmed",
            "The :attribute confirmation does not match.",
            move |check| {
                let confirmation = suffix_field
                    .clone()
                    .unwrap_or_else(|| format!("{}_confirmation", check.field()));
                match (check.value(), check.other(&confirmation)) {
                    (Some(own), Some(theirs)) => value::loose_eq(own, theirs),
                    _ => false,
                }
            },
        ))
    });

    registry.register("in", |_, params| {
        let allowed = member_list(params, "allowed value")?;
        Ok(Predicate::new(
            "in",
            "The selected :attribute is invalid.",
            move |check| {
                check
                    .value()
                    .is_some_and(|v| allowed.contains(&value::display(v)))
            },
        ))
    });

    registry.register("not_in", |_, params| {
        let forbidden = member_list(params, "forbidden value")?;
        let template = format!("The :attribute must not be one of {}.", join(&forbidden));
        Ok(Predicate::new("not_in", template, move |check| {
            check
                .value()
                .is_some_and(|v| !forbidden.contains(&value::display(v)))
        }))
    });

    registry.register("distinct", |_, _| {
        Ok(Predicate::new(
            "distinct",
            "The :attribute field has a duplicate value.",
            |check| !has_sibling_duplicate(check),
        ))
    });
}

/// The membership list with blank tokens dropped. `in:` parses to one empty
/// token, so arity alone would let a never-matching rule through to run
/// time; an empty list is a construction error instead.
fn member_list(params: &[String], what: &str) -> Result<Vec<String>, ParamError> {
    let values: Vec<String> = params
        .iter()
        .filter(|p| !p.trim().is_empty())
        .cloned()
        .collect();
    at_least(&values, 1, what)?;
    Ok(values)
}

/// Whether the value under an expanded wildcard target also appears at a
/// sibling index. Evaluated per element, so each duplicate occurrence is
/// reported under its own indexed name.
fn has_sibling_duplicate(check: &Check<'_>) -> bool {
    let Some(own) = check.value() else {
        return false;
    };
    let segments: Vec<&str> = check.field().split('.').collect();
    let Some(pos) = segments
        .iter()
        .rposition(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
    else {
        // Not an expanded element; nothing to compare against.
        return false;
    };
    let Ok(own_index) = segments[pos].parse::<usize>() else {
        return false;
    };
    let prefix = segments[..pos].join(".");
    let suffix = segments[pos + 1..].join(".");
    if prefix.is_empty() {
        return false;
    }

    let Some(serde_json::Value::Array(items)) = check.other(&prefix) else {
        return false;
    };
    (0..items.len()).any(|index| {
        if index == own_index {
            return false;
        }
        let sibling = if suffix.is_empty() {
            format!("{prefix}.{index}")
        } else {
            format!("{prefix}.{index}.{suffix}")
        };
        check.other(&sibling).is_some_and(|v| value::loose_eq(own, v))
    })
}

#[cfg(test)]
mod tests {
    use crate::registry::Registry;
    use serde_json::json;

    fn failing(data: serde_json::Value, field: &'static str, rules: &'static str) -> bool {
        let registry = Registry::new();
        registry.make(data, [(field, rules)]).unwrap().fails()
    }

    #[test]
    fn same_requires_a_matching_sibling() {
        assert!(!failing(json!({ "a": "x", "b": "x" }), "a", "same:b"));
        assert!(failing(json!({ "a": "x", "b": "y" }), "a", "same:b"));
        assert!(failing(json!({ "a": "x" }), "a", "same:b"));
        // Loose matching crosses the string/number divide.
        assert!(!failing(json!({ "a": "25", "b": 25 }), "a", "same:b"));
    }

    #[test]
    fn different_passes_when_the_sibling_is_absent() {
        assert!(!failing(json!({ "a": "x", "b": "y" }), "a", "different:b"));
        assert!(failing(json!({ "a": "x", "b": "x" }), "a", "different:b"));
        assert!(!failing(json!({ "a": "x" }), "a", "different:b"));
    }

    #[test]
    fn confirmed_uses_the_suffix_convention() {
        let data = json!({ "password": "s3cret", "password_confirmation": "s3cret" });
        assert!(!failing(data, "password", "confirmed"));
        let data = json!({ "password": "s3cret", "password_confirmation": "typo" });
        assert!(failing(data, "password", "confirmed"));
        assert!(failing(json!({ "password": "s3cret" }), "password", "confirmed"));
        // Explicit confirmation field name.
        let data = json!({ "password": "s3cret", "repeat": "s3cret" });
        assert!(!failing(data, "password", "confirmed:repeat"));
    }

    #[test]
    fn membership_rules_match_renderings() {
        assert!(!failing(json!({ "color": "red" }), "color", "in:red,green,blue"));
        assert!(failing(json!({ "color": "pink" }), "color", "in:red,green,blue"));
        assert!(!failing(json!({ "n": 2 }), "n", "in:1,2,3"));
        assert!(failing(json!({ "name": "admin" }), "name", "not_in:admin,root"));
        assert!(!failing(json!({ "name": "ada" }), "name", "not_in:admin,root"));
    }

    #[test]
    fn membership_without_values_is_a_build_error() {
        let registry = Registry::new();
        assert!(registry.make(json!({}), [("color", "in:")]).is_err());
        assert!(registry.make(json!({}), [("color", "in: , ")]).is_err());
        assert!(registry.make(json!({}), [("name", "not_in:")]).is_err());
        // A blank among real values is dropped, not fatal.
        assert!(!failing(json!({ "color": "red" }), "color", "in:red,,blue"));
    }

    #[test]
    fn distinct_flags_each_duplicate_element() {
        let registry = Registry::new();
        let mut v = registry
            .make(
                json!({ "tags": ["a", "b", "a"] }),
                [("tags.*", "distinct")],
            )
            .unwrap();
        assert!(v.fails());
        assert!(v.errors().has("tags.0"));
        assert!(!v.errors().has("tags.1"));
        assert!(v.errors().has("tags.2"));
    }

    #[test]
    fn distinct_reaches_through_nested_wildcards() {
        let data = json!({ "users": [{ "email": "a@b.c" }, { "email": "a@b.c" }] });
        assert!(failing(data, "users.*.email", "distinct"));
        let data = json!({ "users": [{ "email": "a@b.c" }, { "email": "d@e.f" }] });
        assert!(!failing(data, "users.*.email", "distinct"));
    }
}
