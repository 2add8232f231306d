//! Size and comparison rules. "Size" is whatever the sizing contract says
//! for the value and its chain (magnitude, character count or element
//! count); the rules here only compare the resulting number.
//!
//! `gt`/`gte`/`lt`/`lte` take an operand that may name another field;
//! `size`/`min`/`max`/`between` take numeric literals checked at build time.

use crate::operand;
use crate::registry::Registry;
use crate::rule::Check;

use super::{fmt_num, number_param, text_param, Predicate};

pub(crate) fn install(registry: &mut Registry) {
    registry.register("size", |_, params| {
        let expected = number_param(params, 0, "size")?;
        let template = format!("The :attribute must have a size of {}.", fmt_num(expected));
        Ok(Predicate::new("size", template, move |check| {
            check.size().is_some_and(|n| (n - expected).abs() < f64::EPSILON)
        }))
    });

    registry.register("min", |_, params| {
        let min = number_param(params, 0, "minimum")?;
        let template = format!("The :attribute must be at least {}.", fmt_num(min));
        Ok(Predicate::new("min", template, move |check| {
            check.size().is_some_and(|n| n >= min)
        }))
    });

    registry.register("max", |_, params| {
        let max = number_param(params, 0, "maximum")?;
        let template = format!("The :attribute must not be greater than {}.", fmt_num(max));
        Ok(Predicate::new("max", template, move |check| {
            check.size().is_some_and(|n| n <= max)
        }))
    });

    registry.register("between", |_, params| {
        let min = number_param(params, 0, "lower bound")?;
        let max = number_param(params, 1, "upper bound")?;
        let template = format!(
            "The :attribute must be between {} and {}.",
            fmt_num(min),
            fmt_num(max)
        );
        Ok(Predicate::new("between", template, move |check| {
            check.size().is_some_and(|n| n >= min && n <= max)
        }))
    });

    registry.register("gt", |_, params| {
        comparison(params, "gt", "greater than", |own, other| own > other)
    });
    registry.register("gte", |_, params| {
        comparison(params, "gte", "greater than or equal to", |own, other| {
            own >= other
        })
    });
    registry.register("lt", |_, params| {
        comparison(params, "lt", "less than", |own, other| own < other)
    });
    registry.register("lte", |_, params| {
        comparison(params, "lte", "less than or equal to", |own, other| {
            own <= other
        })
    });
}

fn comparison(
    params: &[String],
    name: &'static str,
    relation: &str,
    compare: impl Fn(f64, f64) -> bool + Send + Sync + 'static,
) -> Result<Box<dyn crate::rule::Rule>, crate::error::ParamError> {
    let operand_token = text_param(params, 0, "comparison operand")?;
    let template = format!("The :attribute must be {relation} {operand_token}.");
    Ok(Predicate::new(name, template, move |check: &mut Check<'_>| {
        match (check.size(), operand::comparison_size(check, &operand_token)) {
            (Some(own), Some(other)) => compare(own, other),
            // No resolvable operand: nothing to compare against.
            (_, None) => true,
            (None, Some(_)) => false,
        }
    }))
}
