//! The two pattern rules. Their parameter arrives from the parser as a
//! single token, never comma-split, with any `/.../flags` delimiters
//! already stripped and translated. A token still wearing delimiters means
//! the parser refused its flags, which is a construction-time error here
//! rather than a pattern that matches literal slashes.

use regex::Regex;
use serde_json::Value;

use crate::error::ParamError;
use crate::registry::Registry;
use crate::rule::Check;

use super::Predicate;

pub(crate) fn install(registry: &mut Registry) {
    registry.register("regex", |_, params| {
        let re = compile(params)?;
        Ok(Predicate::new(
            "regex",
            "The :attribute format is invalid.",
            move |check| scalar_text(check).is_some_and(|s| re.is_match(&s)),
        ))
    });

    registry.register("not_regex", |_, params| {
        let re = compile(params)?;
        Ok(Predicate::new(
            "not_regex",
            "The :attribute format is invalid.",
            move |check| scalar_text(check).is_some_and(|s| !re.is_match(&s)),
        ))
    });
}

fn compile(params: &[String]) -> Result<Regex, ParamError> {
    let raw = params
        .first()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ParamError::new("missing pattern"))?;
    if let Some(flags) = refused_flags(raw) {
        return Err(ParamError::new(format!("unsupported pattern flags `{flags}`")));
    }
    Regex::new(raw).map_err(|err| ParamError::new(format!("invalid pattern: {err}")))
}

/// Trailing flags the parser left in place because they are outside the
/// supported `i`/`m`/`s`/`x` set.
fn refused_flags(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let flags = &rest[close + 1..];
    (!flags.is_empty() && flags.chars().all(|c| c.is_ascii_alphabetic())).then_some(flags)
}

/// Strings match as themselves and numbers by their rendering; collections,
/// booleans and null never match.
fn scalar_text(check: &Check<'_>) -> Option<String> {
    match check.value() {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
