//! The rule contract and the per-evaluation view handed to every rule.

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

use crate::context::{self, FieldContext};
use crate::path;
use crate::value;
use crate::Record;

/// One runnable, parameterized constraint.
///
/// Instances are built fresh per validation session by the registry and are
/// never shared between sessions. A rule judges the field through the
/// [`Check`] view, which carries everything a rule may need — the resolved
/// value, the whole record for cross-field rules, presence queries, and the
/// chain's [`FieldContext`] — so there is no capability probing: the one
/// capability the engine branches on is [`is_implicit`](Rule::is_implicit).
pub trait Rule: Send + Sync {
    /// The registry name of this rule (`"required"`, `"min"`, ...), used
    /// for custom-message lookup keys.
    fn name(&self) -> &str;

    /// Judges the field. Returning `false` records this rule's message.
    fn passes(&self, check: &mut Check<'_>) -> bool;

    /// The default message template. Must contain the `:attribute`
    /// placeholder; parameter values are baked in at construction time.
    fn message(&self) -> Cow<'static, str>;

    /// Implicit rules run even when the field is absent or null, because
    /// presence itself is what they judge; their failure halts the field's
    /// remaining chain.
    fn is_implicit(&self) -> bool {
        false
    }
}

/// The evaluation view for one rule invocation on one field.
pub struct Check<'a> {
    field: &'a str,
    value: Option<&'a Value>,
    record: &'a Record,
    ctx: &'a mut FieldContext,
    chain_numeric: bool,
    facts: &'a HashMap<String, bool>,
}

impl<'a> Check<'a> {
    pub(crate) fn new(
        field: &'a str,
        value: Option<&'a Value>,
        record: &'a Record,
        ctx: &'a mut FieldContext,
        chain_numeric: bool,
        facts: &'a HashMap<String, bool>,
    ) -> Self {
        Self {
            field,
            value,
            record,
            ctx,
            chain_numeric,
            facts,
        }
    }

    /// The field under validation. For wildcard specifications this is the
    /// expanded, indexed name (`users.1.email`).
    #[must_use]
    pub fn field(&self) -> &str {
        self.field
    }

    /// The resolved value, or `None` when the field is absent.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value
    }

    /// The whole record, for cross-field rules.
    #[must_use]
    pub fn record(&self) -> &Record {
        self.record
    }

    /// Resolves another field by dotted path.
    #[must_use]
    pub fn other(&self, field: &str) -> Option<&Value> {
        path::resolve(self.record, field)
    }

    /// Whether the field exists in the record at all, independent of its
    /// value — a null value still counts as present.
    #[must_use]
    pub fn is_present(&self, field: &str) -> bool {
        path::resolve(self.record, field).is_some()
    }

    /// The chain's accumulated facts.
    #[must_use]
    pub fn context(&self) -> &FieldContext {
        self.ctx
    }

    /// The size of the field's own value under the chain's sizing contract:
    /// numeric magnitude when the chain declares a numeric-establishing
    /// rule (or one already ran) and the value reads as a number, character
    /// or element count otherwise.
    #[must_use]
    pub fn size(&self) -> Option<f64> {
        let value = self.value?;
        let numeric = self.ctx.numeric_established()
            || (self.chain_numeric && value::as_number(value).is_some());
        context::value_size(value, numeric)
    }

    /// The size of a sibling field, computed under *that* field's own chain
    /// declarations, not this one's.
    #[must_use]
    pub fn size_of(&self, field: &str) -> Option<f64> {
        let value = self.other(field)?;
        let declares = self.facts.get(field).copied().unwrap_or(false);
        let numeric = declares && value::as_number(value).is_some();
        context::value_size(value, numeric)
    }
}
