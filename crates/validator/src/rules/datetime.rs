//! Temporal rules over ISO-style `YYYY-MM-DD[THH:MM:SS]` values. Operands
//! resolve field-vs-literal through the cross-field resolver.

use crate::error::ParamError;
use crate::operand::{self, Temporal};
use crate::registry::Registry;
use crate::rule::{Check, Rule};
use crate::value;

use super::{text_param, Predicate};

pub(crate) fn install(registry: &mut Registry) {
    registry.register("date", |_, _| {
        Ok(Predicate::new(
            "date",
            "The :attribute is not a valid date.",
            |check| own_instant(check).is_some(),
        ))
    });

    registry.register("after", |_, params| {
        temporal_rule(params, "after", "after", |own, other| own > other)
    });
    registry.register("before", |_, params| {
        temporal_rule(params, "before", "before", |own, other| own < other)
    });
    registry.register("after_or_equal", |_, params| {
        temporal_rule(params, "after_or_equal", "after or equal to", |own, other| {
            own >= other
        })
    });
    registry.register("before_or_equal", |_, params| {
        temporal_rule(params, "before_or_equal", "before or equal to", |own, other| {
            own <= other
        })
    });
    registry.register("date_equals", |_, params| {
        temporal_rule(params, "date_equals", "equal to", |own, other| own == other)
    });
}

fn temporal_rule(
    params: &[String],
    name: &'static str,
    relation: &str,
    compare: impl Fn(i64, i64) -> bool + Send + Sync + 'static,
) -> Result<Box<dyn Rule>, ParamError> {
    let operand_token = text_param(params, 0, "date or field")?;
    let template = format!("The :attribute must be a date {relation} {operand_token}.");
    Ok(Predicate::new(name, template, move |check: &mut Check<'_>| {
        let Some(own) = own_instant(check) else {
            return false;
        };
        match operand::temporal(check, &operand_token) {
            Temporal::At(other) => compare(own, other),
            Temporal::Invalid => false,
            Temporal::Vacuous => true,
        }
    }))
}

fn own_instant(check: &Check<'_>) -> Option<i64> {
    let rendered = value::display(check.value()?);
    operand::parse_datetime(rendered.trim())
}
