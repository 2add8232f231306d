//! String-content and format rules. All of these demand an actual JSON
//! string; numbers and collections fail rather than being coerced.

use std::sync::Arc;

use serde_json::Value;

use crate::error::ParamError;
use crate::registry::{Patterns, Registry};
use crate::rule::Check;

use super::{at_least, join, Predicate};

pub(crate) fn install(registry: &mut Registry) {
    registry.register("alpha", |_, params| {
        let ascii = ascii_variant(params)?;
        Ok(Predicate::new(
            "alpha",
            "The :attribute may only contain letters.",
            move |check| {
                chars_ok(check, |c| {
                    if ascii {
                        c.is_ascii_alphabetic()
                    } else {
                        c.is_alphabetic()
                    }
                })
            },
        ))
    });

    registry.register("alpha_num", |_, params| {
        let ascii = ascii_variant(params)?;
        Ok(Predicate::new(
            "alpha_num",
            "The :attribute may only contain letters and numbers.",
            move |check| {
                chars_ok(check, |c| {
                    if ascii {
                        c.is_ascii_alphanumeric()
                    } else {
                        c.is_alphanumeric()
                    }
                })
            },
        ))
    });

    registry.register("alpha_dash", |_, params| {
        let ascii = ascii_variant(params)?;
        Ok(Predicate::new(
            "alpha_dash",
            "The :attribute may only contain letters, numbers, dashes and underscores.",
            move |check| {
                chars_ok(check, |c| {
                    let letterish = if ascii {
                        c.is_ascii_alphanumeric()
                    } else {
                        c.is_alphanumeric()
                    };
                    letterish || c == '-' || c == '_'
                })
            },
        ))
    });

    registry.register("ascii", |_, _| {
        Ok(Predicate::new(
            "ascii",
            "The :attribute must only contain ASCII characters.",
            |check| text(check).is_some_and(str::is_ascii),
        ))
    });

    registry.register("uppercase", |_, _| {
        Ok(Predicate::new(
            "uppercase",
            "The :attribute must be uppercase.",
            |check| text(check).is_some_and(|s| s == s.to_uppercase()),
        ))
    });

    registry.register("lowercase", |_, _| {
        Ok(Predicate::new(
            "lowercase",
            "The :attribute must be lowercase.",
            |check| text(check).is_some_and(|s| s == s.to_lowercase()),
        ))
    });

    registry.register("starts_with", |_, params| {
        at_least(params, 1, "prefix")?;
        let prefixes = params.to_vec();
        let template = format!(
            "The :attribute must start with one of the following: {}.",
            join(&prefixes)
        );
        Ok(Predicate::new("starts_with", template, move |check| {
            text(check).is_some_and(|s| prefixes.iter().any(|p| s.starts_with(p.as_str())))
        }))
    });

    registry.register("ends_with", |_, params| {
        at_least(params, 1, "suffix")?;
        let suffixes = params.to_vec();
        let template = format!(
            "The :attribute must end with one of the following: {}.",
            join(&suffixes)
        );
        Ok(Predicate::new("ends_with", template, move |check| {
            text(check).is_some_and(|s| suffixes.iter().any(|p| s.ends_with(p.as_str())))
        }))
    });

    registry.register("doesnt_start_with", |_, params| {
        at_least(params, 1, "prefix")?;
        let prefixes = params.to_vec();
        let template = format!(
            "The :attribute must not start with one of the following: {}.",
            join(&prefixes)
        );
        Ok(Predicate::new("doesnt_start_with", template, move |check| {
            text(check).is_some_and(|s| prefixes.iter().all(|p| !s.starts_with(p.as_str())))
        }))
    });

    registry.register("doesnt_end_with", |_, params| {
        at_least(params, 1, "suffix")?;
        let suffixes = params.to_vec();
        let template = format!(
            "The :attribute must not end with one of the following: {}.",
            join(&suffixes)
        );
        Ok(Predicate::new("doesnt_end_with", template, move |check| {
            text(check).is_some_and(|s| suffixes.iter().all(|p| !s.ends_with(p.as_str())))
        }))
    });

    registry.register("email", |ctx, _| {
        Ok(format_rule(
            ctx.patterns(),
            "email",
            "The :attribute must be a valid email address.",
            |p, s| p.email.is_match(s),
        ))
    });

    registry.register("url", |ctx, _| {
        Ok(format_rule(
            ctx.patterns(),
            "url",
            "The :attribute must be a valid URL.",
            |p, s| p.url.is_match(s),
        ))
    });

    registry.register("uuid", |ctx, _| {
        Ok(format_rule(
            ctx.patterns(),
            "uuid",
            "The :attribute must be a valid UUID.",
            |p, s| p.uuid.is_match(s),
        ))
    });

    registry.register("ulid", |ctx, _| {
        Ok(format_rule(
            ctx.patterns(),
            "ulid",
            "The :attribute must be a valid ULID.",
            |p, s| p.ulid.is_match(s),
        ))
    });

    registry.register("hex_color", |ctx, _| {
        Ok(format_rule(
            ctx.patterns(),
            "hex_color",
            "The :attribute must be a valid hexadecimal color.",
            |p, s| p.hex_color.is_match(s),
        ))
    });
}

/// The value as a string, `None` for any other shape.
fn text<'c>(check: &'c Check<'_>) -> Option<&'c str> {
    match check.value() {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

fn chars_ok(check: &Check<'_>, allowed: impl Fn(char) -> bool) -> bool {
    text(check).is_some_and(|s| !s.is_empty() && s.chars().all(allowed))
}

/// The optional `ascii` parameter on the alpha family.
fn ascii_variant(params: &[String]) -> Result<bool, ParamError> {
    match params {
        [] => Ok(false),
        [p] if p == "ascii" => Ok(true),
        [p, ..] => Err(ParamError::new(format!("unknown variant `{p}`"))),
    }
}

fn format_rule(
    patterns: &Arc<Patterns>,
    name: &'static str,
    template: &'static str,
    matches: impl Fn(&Patterns, &str) -> bool + Send + Sync + 'static,
) -> Box<dyn crate::rule::Rule> {
    let patterns = Arc::clone(patterns);
    Predicate::new(name, template, move |check| {
        text(check).is_some_and(|s| matches(&patterns, s))
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
    fn alpha_family() {
        assert!(!failing(json!({ "x": "héllo" }), "x", "alpha"));
        assert!(failing(json!({ "x": "héllo" }), "x", "alpha:ascii"));
        assert!(failing(json!({ "x": "ab1" }), "x", "alpha"));
        assert!(!failing(json!({ "x": "ab1" }), "x", "alpha_num"));
        assert!(failing(json!({ "x": "ab-1" }), "x", "alpha_num"));
        assert!(!failing(json!({ "x": "ab-1_c" }), "x", "alpha_dash"));
        assert!(failing(json!({ "x": "" }), "x", "alpha|required"));
        let registry = Registry::new();
        assert!(registry.make(json!({}), [("x", "alpha:greek")]).is_err());
    }

    #[test]
    fn case_rules() {
        assert!(!failing(json!({ "x": "HELLO 1" }), "x", "uppercase"));
        assert!(failing(json!({ "x": "Hello" }), "x", "uppercase"));
        assert!(!failing(json!({ "x": "hello 1" }), "x", "lowercase"));
        assert!(failing(json!({ "x": "Hello" }), "x", "lowercase"));
        assert!(!failing(json!({ "x": "plain" }), "x", "ascii"));
        assert!(failing(json!({ "x": "naïve" }), "x", "ascii"));
    }

    #[test]
    fn affix_rules() {
        assert!(!failing(json!({ "x": "img_cat.png" }), "x", "starts_with:img_,pic_"));
        assert!(failing(json!({ "x": "cat.png" }), "x", "starts_with:img_,pic_"));
        assert!(!failing(json!({ "x": "cat.png" }), "x", "ends_with:.png,.jpg"));
        assert!(failing(json!({ "x": "cat.gif" }), "x", "ends_with:.png,.jpg"));
        assert!(failing(json!({ "x": "tmp_cat" }), "x", "doesnt_start_with:tmp_"));
        assert!(!failing(json!({ "x": "cat" }), "x", "doesnt_end_with:_tmp"));
    }

    #[test]
    fn format_rules_demand_strings() {
        assert!(!failing(json!({ "x": "ada@example.com" }), "x", "email"));
        assert!(failing(json!({ "x": "ada@example" }), "x", "email"));
        assert!(failing(json!({ "x": 42 }), "x", "email"));
        assert!(!failing(json!({ "x": "https://example.com" }), "x", "url"));
        assert!(failing(json!({ "x": "example dot com" }), "x", "url"));
        assert!(!failing(
            json!({ "x": "550e8400-e29b-41d4-a716-446655440000" }),
            "x",
            "uuid"
        ));
        assert!(failing(json!({ "x": "not-a-uuid" }), "x", "uuid"));
        assert!(!failing(json!({ "x": "01ARZ3NDEKTSV4RRFFQ69G5FAV" }), "x", "ulid"));
        assert!(!failing(json!({ "x": "#ffcc00" }), "x", "hex_color"));
        assert!(failing(json!({ "x": "ffcc00" }), "x", "hex_color"));
    }
}
