//! Error types.
//!
//! Two tiers, deliberately kept apart: [`BuildError`] is raised while a
//! specification is being compiled, before any field value is inspected;
//! [`ValidationFailure`] is the optional `Err`-shaped surface over a run
//! whose real output is the [`ErrorBag`](crate::ErrorBag).

use std::fmt;

use crate::bag::ErrorBag;

/// A specification could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A rule name had no entry in the registry.
    #[error("unknown validation rule `{rule}` for field `{field}`")]
    UnknownRule {
        /// The unmatched rule name, already lower-cased.
        rule: String,
        /// The field whose specification named it.
        field: String,
    },

    /// A rule constructor rejected its parameters.
    #[error("rule `{rule}` on field `{field}`: {reason}")]
    BadParameter {
        /// The rule being constructed.
        rule: String,
        /// The field whose specification named it.
        field: String,
        /// The constructor's complaint, e.g. `invalid minimum \`abc\``.
        reason: String,
    },

    /// The record handed to `make` was not a JSON object.
    #[error("validation data must be a JSON object")]
    NonObjectData,
}

/// A constructor-level parameter complaint. The registry wraps it into
/// [`BuildError::BadParameter`] together with the rule and field names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParamError(pub String);

impl ParamError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// The whole-run failure carrying the accumulated messages, for callers who
/// prefer `?` over querying [`Validator::passes`](crate::Validator::passes).
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    errors: ErrorBag,
}

impl ValidationFailure {
    pub(crate) fn new(errors: ErrorBag) -> Self {
        Self { errors }
    }

    /// The per-field messages from the failed run.
    #[must_use]
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// Consumes the failure, yielding the bag.
    #[must_use]
    pub fn into_errors(self) -> ErrorBag {
        self.errors
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed with {} message(s)", self.errors.count())?;
        for (field, messages) in self.errors.all() {
            for message in messages {
                write!(f, "\n  {field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_error_names_rule_and_field() {
        let err = BuildError::UnknownRule {
            rule: "requierd".into(),
            field: "email".into(),
        };
        let text = err.to_string();
        assert!(text.contains("requierd"));
        assert!(text.contains("email"));
    }

    #[test]
    fn failure_lists_messages() {
        let mut bag = ErrorBag::new();
        bag.add("name", "The name field is required.");
        let failure = ValidationFailure::new(bag);
        let text = failure.to_string();
        assert!(text.contains("1 message(s)"));
        assert!(text.contains("name: The name field is required."));
    }
}
