//! One-line import for the common surface:
//! `use veto_validator::prelude::*;`

pub use crate::bag::ErrorBag;
pub use crate::engine::Validator;
pub use crate::error::{BuildError, ParamError, ValidationFailure};
pub use crate::grammar::{parse_field_spec, RawRule};
pub use crate::registry::{BuildContext, Config, Patterns, Registry, RuleConstructor};
pub use crate::rule::{Check, Rule};
pub use crate::rules::Predicate;
pub use crate::Record;
