//! The built-in rule catalogue.
//!
//! Each submodule installs one category of constructors into the
//! [`Registry`]. The predicates themselves are deliberately mechanical;
//! everything order- or state-dependent lives in the engine.

mod compare;
mod datetime;
mod network;
mod pattern;
mod presence;
mod size;
mod string;
mod types;

use std::borrow::Cow;

use crate::error::ParamError;
use crate::registry::Registry;
use crate::rule::{Check, Rule};

pub(crate) fn install(registry: &mut Registry) {
    presence::install(registry);
    types::install(registry);
    size::install(registry);
    string::install(registry);
    pattern::install(registry);
    compare::install(registry);
    datetime::install(registry);
    network::install(registry);
}

/// A rule built from a closure, which is how the whole built-in catalogue
/// is expressed. Also handy for one-off custom rules:
///
/// ```rust,ignore
/// registry.register("even", |_, _| {
///     Ok(Predicate::new("even", "The :attribute must be even.", |check| {
///         check.size().is_some_and(|n| n % 2.0 == 0.0)
///     }))
/// });
/// ```
pub struct Predicate {
    name: Cow<'static, str>,
    template: Cow<'static, str>,
    implicit: bool,
    test: Box<dyn Fn(&mut Check<'_>) -> bool + Send + Sync>,
}

impl Predicate {
    /// An ordinary rule: skipped when the value is absent or null.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        template: impl Into<Cow<'static, str>>,
        test: impl Fn(&mut Check<'_>) -> bool + Send + Sync + 'static,
    ) -> Box<dyn Rule> {
        Box::new(Self {
            name: name.into(),
            template: template.into(),
            implicit: false,
            test: Box::new(test),
        })
    }

    /// An implicit rule: runs even on absent values, and its failure halts
    /// the rest of the field's chain.
    pub fn implicit(
        name: impl Into<Cow<'static, str>>,
        template: impl Into<Cow<'static, str>>,
        test: impl Fn(&mut Check<'_>) -> bool + Send + Sync + 'static,
    ) -> Box<dyn Rule> {
        Box::new(Self {
            name: name.into(),
            template: template.into(),
            implicit: true,
            test: Box::new(test),
        })
    }
}

impl Rule for Predicate {
    fn name(&self) -> &str {
        &self.name
    }

    fn passes(&self, check: &mut Check<'_>) -> bool {
        (self.test)(check)
    }

    fn message(&self) -> Cow<'static, str> {
        self.template.clone()
    }

    fn is_implicit(&self) -> bool {
        self.implicit
    }
}

/// Fetches a required textual parameter.
pub(crate) fn text_param(params: &[String], index: usize, what: &str) -> Result<String, ParamError> {
    params
        .get(index)
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.trim().to_string())
        .ok_or_else(|| ParamError::new(format!("missing {what}")))
}

/// Fetches a required numeric parameter.
pub(crate) fn number_param(params: &[String], index: usize, what: &str) -> Result<f64, ParamError> {
    let raw = text_param(params, index, what)?;
    raw.parse::<f64>()
        .map_err(|_| ParamError::new(format!("invalid {what} `{raw}`")))
}

/// Fetches a required non-negative integer parameter.
pub(crate) fn count_param(params: &[String], index: usize, what: &str) -> Result<usize, ParamError> {
    let raw = text_param(params, index, what)?;
    raw.parse::<usize>()
        .map_err(|_| ParamError::new(format!("invalid {what} `{raw}`")))
}

/// Requires at least `n` parameters.
pub(crate) fn at_least(params: &[String], n: usize, what: &str) -> Result<(), ParamError> {
    if params.len() < n {
        Err(ParamError::new(format!(
            "expected at least {n} parameter(s): {what}"
        )))
    } else {
        Ok(())
    }
}

/// Renders a bound for a message: `5` rather than `5.0`, but `2.5` as is.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Joins parameter values for a message: `a, b, c`.
pub(crate) fn join(values: &[String]) -> String {
    values.join(", ")
}
