//! # veto-validator
//!
//! A declarative validation engine for JSON-shaped records. Fields are
//! declared with compact rule strings and validated in one pass:
//!
//! ```rust,ignore
//! use veto_validator::prelude::*;
//! use serde_json::json;
//!
//! let registry = Registry::new();
//! let mut v = registry.make(
//!     json!({ "name": "ada", "age": "36" }),
//!     [("name", "required|alpha"), ("age", "required|integer|between:18,130")],
//! )?;
//!
//! assert!(v.passes());
//! ```
//!
//! ## Rule grammar
//!
//! A field specification is a pipe-separated chain: `required|email|max:64`.
//! Each rule is a lower-case name with optional `:`-separated parameters,
//! comma-split with quote awareness (`starts_with:"a,b",c`). The two pattern
//! rules (`regex`, `not_regex`) keep everything after the first colon as a
//! single verbatim parameter so patterns like `{1,20}` survive.
//!
//! ## Errors
//!
//! Misconfigured specifications (unknown rule name, malformed parameter)
//! fail at [`Registry::make`] time with a [`BuildError`], before any data is
//! inspected. Data failures are never `Err`: they accumulate as rendered
//! messages in the [`ErrorBag`], queried through [`Validator::errors`] or
//! surfaced wholesale via [`Validator::validate`].

// Trait objects are the dispatch mechanism for the rule catalogue; boxing is
// inherent to the registry design.
#![allow(clippy::result_large_err)]

mod bag;
mod context;
mod engine;
mod error;
mod grammar;
mod operand;
mod path;
mod registry;
mod rule;
pub mod rules;
mod value;

pub mod prelude;

pub use bag::ErrorBag;
pub use context::FieldContext;
pub use engine::Validator;
pub use error::{BuildError, ParamError, ValidationFailure};
pub use grammar::{RawRule, parse_field_spec};
pub use registry::{BuildContext, Config, Patterns, Registry, RuleConstructor};
pub use rule::{Check, Rule};

/// A record under validation: field name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;
