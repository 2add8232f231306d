//! The rule-specification grammar.
//!
//! ```text
//! spec         := rule ('|' rule)*
//! rule         := name (':' paramtext)?
//! paramtext    := pattern-param | plain-params
//! plain-params := token (',' token)*      quote-aware, quotes stripped
//! pattern-param := verbatim remainder     only for regex / not_regex;
//!                                         `/.../flags` delimiters stripped
//! ```
//!
//! Names are matched case-insensitively (lower-cased here, once). Whether a
//! name actually exists is the registry's call, made at compile time.

use smallvec::SmallVec;

/// Rule names whose parameter text is never comma-split: regular-expression
/// syntax legitimately contains commas (`{1,20}`, alternation lists), so the
/// whole remainder after the first colon is one token.
const PATTERN_RULES: &[&str] = &["regex", "not_regex"];

/// One parsed rule invocation: a lower-cased name plus raw parameter tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRule {
    /// Lower-cased rule name.
    pub name: String,
    /// Parameter tokens, quotes already stripped.
    pub params: SmallVec<[String; 2]>,
}

/// Parses one field's rule text into its ordered invocations.
///
/// Empty pipe segments are dropped, so `"required||email"` and a trailing
/// pipe are harmless. This never fails: unknown names and malformed
/// parameters are compile-time concerns of the registry.
#[must_use]
pub fn parse_field_spec(spec: &str) -> Vec<RawRule> {
    spec.split('|')
        .filter_map(|token| {
            let token = token.trim();
            if token.is_empty() {
                return None;
            }
            let (name, param_text) = match token.split_once(':') {
                Some((name, rest)) => (name, Some(rest)),
                None => (token, None),
            };
            let name = name.trim().to_lowercase();
            if name.is_empty() {
                return None;
            }
            let params = match param_text {
                None => SmallVec::new(),
                Some(text) if PATTERN_RULES.contains(&name.as_str()) => {
                    let mut single = SmallVec::new();
                    single.push(strip_pattern_delimiters(text));
                    single
                }
                Some(text) => split_params(text),
            };
            Some(RawRule { name, params })
        })
        .collect()
}

/// Strips optional `/.../flags` delimiters from a pattern parameter,
/// translating trailing flags into an inline group (`/ab/i` becomes
/// `(?i)ab`). Supported flags are `i`, `m`, `s` and `x`; text without
/// well-formed delimiters, or with flags outside that set, is kept
/// verbatim for the rule constructor to judge.
fn strip_pattern_delimiters(raw: &str) -> String {
    let stripped = (|| {
        let rest = raw.strip_prefix('/')?;
        let close = rest.rfind('/')?;
        let body = &rest[..close];
        let flags = &rest[close + 1..];
        if !flags.chars().all(|f| matches!(f, 'i' | 'm' | 's' | 'x')) {
            return None;
        }
        if flags.is_empty() {
            Some(body.to_string())
        } else {
            Some(format!("(?{flags}){body}"))
        }
    })();
    stripped.unwrap_or_else(|| raw.to_string())
}

/// Splits parameter text on commas, with quote awareness.
///
/// A `'` or `"` toggles an in-quotes state during which commas are literal;
/// only the same character closes the quote, and the quote characters are
/// stripped from the emitted token. An unterminated quote is treated as
/// closed at end of text.
fn split_params(text: &str) -> SmallVec<[String; 2]> {
    let mut params = SmallVec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in text.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                ',' => params.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            },
        }
    }
    params.push(current);
    params
}
