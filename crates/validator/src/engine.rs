//! The per-field rule-chain execution engine.

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use crate::bag::ErrorBag;
use crate::context::FieldContext;
use crate::error::ValidationFailure;
use crate::path;
use crate::rule::{Check, Rule};
use crate::Record;

/// Which chain fact a rule records on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Establishes {
    Numeric,
    Integer,
}

pub(crate) struct CompiledRule {
    pub rule: Box<dyn Rule>,
    pub establishes: Option<Establishes>,
}

/// One field's compiled chain: its runnable rules plus the modifier flags
/// (`bail`, `sometimes`, `nullable`) and whether any rule in the chain is
/// numeric-establishing.
pub(crate) struct FieldChain {
    pub field: String,
    pub rules: Vec<CompiledRule>,
    pub declares_numeric: bool,
    pub bail: bool,
    pub sometimes: bool,
    pub nullable: bool,
}

impl FieldChain {
    pub(crate) fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rules: Vec::new(),
            declares_numeric: false,
            bail: false,
            sometimes: false,
            nullable: false,
        }
    }
}

struct Conditional {
    chain: FieldChain,
    applies: Box<dyn Fn(&Record) -> bool + Send + Sync>,
}

/// One validation session: a record, its compiled chains, and the error bag
/// a run fills. Built by [`Registry::make`](crate::Registry::make).
///
/// Querying methods (`passes`, `fails`, `validate`, `valid`, `invalid`)
/// each perform a full run over the current configuration; the bag from the
/// latest run stays readable through [`errors`](Validator::errors).
pub struct Validator {
    data: Record,
    chains: Vec<FieldChain>,
    conditional: Vec<Conditional>,
    messages: HashMap<String, String>,
    attributes: HashMap<String, String>,
    stop_on_first_failure: bool,
    errors: ErrorBag,
}

impl Validator {
    pub(crate) fn new(data: Record, chains: Vec<FieldChain>) -> Self {
        Self {
            data,
            chains,
            conditional: Vec::new(),
            messages: HashMap::new(),
            attributes: HashMap::new(),
            stop_on_first_failure: false,
            errors: ErrorBag::new(),
        }
    }

    /// The record under validation.
    #[must_use]
    pub fn data(&self) -> &Record {
        &self.data
    }

    /// Overrides the message for one lookup key. Keys are either
    /// `"field.rule"` (most specific) or bare `"rule"`; the template may use
    /// `:attribute`.
    pub fn set_message(
        &mut self,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> &mut Self {
        self.messages.insert(key.into(), template.into());
        self
    }

    /// Overrides the display name substituted for `:attribute` in messages
    /// about a field.
    pub fn set_attribute(
        &mut self,
        field: impl Into<String>,
        display: impl Into<String>,
    ) -> &mut Self {
        self.attributes.insert(field.into(), display.into());
        self
    }

    /// Halts the whole run at the first recorded failure, leaving at most
    /// one message in the bag.
    pub fn stop_on_first_failure(&mut self) -> &mut Self {
        self.stop_on_first_failure = true;
        self
    }

    /// Appends a rule to a field's chain, creating the chain if the field
    /// has none. Rules added here never establish chain facts; declare them
    /// in the ruleset when sizing depends on them.
    pub fn add_rule(&mut self, field: &str, rule: Box<dyn Rule>) -> &mut Self {
        let compiled = CompiledRule {
            rule,
            establishes: None,
        };
        match self.chains.iter_mut().find(|chain| chain.field == field) {
            Some(chain) => chain.rules.push(compiled),
            None => {
                let mut chain = FieldChain::new(field);
                chain.rules.push(compiled);
                self.chains.push(chain);
            }
        }
        self
    }

    /// Attaches rules that only apply when `applies` holds for the record,
    /// judged at run time.
    pub fn sometimes<F>(
        &mut self,
        field: impl Into<String>,
        rules: Vec<Box<dyn Rule>>,
        applies: F,
    ) -> &mut Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        let mut chain = FieldChain::new(field);
        chain.rules = rules
            .into_iter()
            .map(|rule| CompiledRule {
                rule,
                establishes: None,
            })
            .collect();
        self.conditional.push(Conditional {
            chain,
            applies: Box::new(applies),
        });
        self
    }

    /// Runs the chains and reports whether the bag stayed empty.
    pub fn passes(&mut self) -> bool {
        self.run();
        self.errors.is_empty()
    }

    /// Inverse of [`passes`](Validator::passes).
    pub fn fails(&mut self) -> bool {
        !self.passes()
    }

    /// Runs the chains, surfacing any failures as an `Err` carrying the bag.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] when any rule recorded a message.
    pub fn validate(&mut self) -> Result<(), ValidationFailure> {
        if self.passes() {
            Ok(())
        } else {
            Err(ValidationFailure::new(self.errors.clone()))
        }
    }

    /// The messages from the latest run.
    #[must_use]
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// Runs the chains and returns the top-level entries that collected no
    /// failures (directly or under an expanded index).
    pub fn valid(&mut self) -> Record {
        self.run();
        self.partition(false)
    }

    /// Runs the chains and returns the top-level entries that failed.
    pub fn invalid(&mut self) -> Record {
        self.run();
        self.partition(true)
    }

    fn partition(&self, failed: bool) -> Record {
        self.data
            .iter()
            .filter(|(field, _)| self.field_failed(field) == failed)
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    fn field_failed(&self, field: &str) -> bool {
        let prefix = format!("{field}.");
        self.errors
            .all()
            .keys()
            .any(|key| key == field || key.starts_with(&prefix))
    }

    fn run(&mut self) {
        self.errors.clear();

        let mut facts: HashMap<String, bool> = HashMap::new();
        for chain in &self.chains {
            facts.insert(chain.field.clone(), chain.declares_numeric);
        }

        let data = &self.data;
        let active: Vec<&FieldChain> = self
            .chains
            .iter()
            .chain(
                self.conditional
                    .iter()
                    .filter(|conditional| (conditional.applies)(data))
                    .map(|conditional| &conditional.chain),
            )
            .collect();

        let errors = &mut self.errors;
        'run: for chain in active {
            let targets = if path::has_wildcard(&chain.field) {
                path::expand_wildcard(data, &chain.field)
            } else {
                vec![chain.field.clone()]
            };
            for target in targets {
                // `sometimes` is judged per expanded target, so a wildcard
                // chain still sees the elements that do carry the field.
                if chain.sometimes && path::resolve(data, &target).is_none() {
                    continue;
                }
                let stopped = run_chain(RunInput {
                    data,
                    facts: &facts,
                    messages: &self.messages,
                    attributes: &self.attributes,
                    stop_on_first_failure: self.stop_on_first_failure,
                    errors: &mut *errors,
                    chain,
                    target: &target,
                });
                if stopped {
                    break 'run;
                }
            }
        }
    }
}

struct RunInput<'a> {
    data: &'a Record,
    facts: &'a HashMap<String, bool>,
    messages: &'a HashMap<String, String>,
    attributes: &'a HashMap<String, String>,
    stop_on_first_failure: bool,
    errors: &'a mut ErrorBag,
    chain: &'a FieldChain,
    target: &'a str,
}

/// Evaluates one chain against one concrete target. Returns `true` when the
/// whole run must stop.
fn run_chain(input: RunInput<'_>) -> bool {
    let RunInput {
        data,
        facts,
        messages,
        attributes,
        stop_on_first_failure,
        errors,
        chain,
        target,
    } = input;

    let mut ctx = FieldContext::default();
    let value = path::resolve(data, target);
    // A nullable chain accepts an explicit null outright, implicit rules
    // included; absence is still judged normally.
    if chain.nullable && matches!(value, Some(Value::Null)) {
        return false;
    }
    let skippable = matches!(value, None | Some(Value::Null));

    for compiled in &chain.rules {
        let rule = compiled.rule.as_ref();
        // Only implicit rules get to judge absent or null values.
        if skippable && !rule.is_implicit() {
            continue;
        }

        let mut check = Check::new(target, value, data, &mut ctx, chain.declares_numeric, facts);
        if rule.passes(&mut check) {
            match compiled.establishes {
                Some(Establishes::Numeric) => ctx.establish_numeric(),
                Some(Establishes::Integer) => ctx.establish_integer(),
                None => {}
            }
            continue;
        }

        trace!(field = target, rule = rule.name(), "rule failed");
        errors.add(target, render(messages, attributes, target, &chain.field, rule));

        if stop_on_first_failure {
            return true;
        }
        // A presence-level failure makes the rest of the chain meaningless.
        if rule.is_implicit() || chain.bail {
            break;
        }
    }
    false
}

/// Renders a failure message: most specific override first, then the rule's
/// default template, with `:attribute` substituted last. For wildcard
/// chains the expanded indexed name is consulted before the declared name.
fn render(
    messages: &HashMap<String, String>,
    attributes: &HashMap<String, String>,
    target: &str,
    declared: &str,
    rule: &dyn Rule,
) -> String {
    let name = rule.name();
    let template = messages
        .get(&format!("{target}.{name}"))
        .or_else(|| {
            if target == declared {
                None
            } else {
                messages.get(&format!("{declared}.{name}"))
            }
        })
        .or_else(|| messages.get(name))
        .map_or_else(|| rule.message(), |custom| Cow::Owned(custom.clone()));

    let attribute = attributes
        .get(target)
        .or_else(|| {
            if target == declared {
                None
            } else {
                attributes.get(declared)
            }
        })
        .map_or(target, String::as_str);

    template.replace(":attribute", attribute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    struct Fixed {
        name: &'static str,
        outcome: bool,
        implicit: bool,
    }

    impl Rule for Fixed {
        fn name(&self) -> &str {
            self.name
        }
        fn passes(&self, _check: &mut Check<'_>) -> bool {
            self.outcome
        }
        fn message(&self) -> Cow<'static, str> {
            Cow::Owned(format!("The :attribute breaks {}.", self.name))
        }
        fn is_implicit(&self) -> bool {
            self.implicit
        }
    }

    fn failing(name: &'static str) -> Box<dyn Rule> {
        Box::new(Fixed {
            name,
            outcome: false,
            implicit: false,
        })
    }

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn message_overrides_resolve_most_specific_first() {
        let data = record(serde_json::json!({ "name": "x" }));
        let mut v = Validator::new(data, Vec::new());
        v.add_rule("name", failing("alpha"));
        v.set_message("alpha", "generic :attribute");
        assert!(v.fails());
        assert_eq!(v.errors().first("name"), Some("generic name"));

        v.set_message("name.alpha", "specific :attribute");
        assert!(v.fails());
        assert_eq!(v.errors().first("name"), Some("specific name"));
    }

    #[test]
    fn attribute_override_substitutes_display_name() {
        let data = record(serde_json::json!({ "fn": "x" }));
        let mut v = Validator::new(data, Vec::new());
        v.add_rule("fn", failing("alpha"));
        v.set_attribute("fn", "first name");
        assert!(v.fails());
        assert_eq!(v.errors().first("fn"), Some("The first name breaks alpha."));
    }

    #[test]
    fn reruns_replace_the_bag() {
        let data = record(serde_json::json!({ "name": "x" }));
        let mut v = Validator::new(data, Vec::new());
        v.add_rule("name", failing("alpha"));
        assert!(v.fails());
        assert!(v.fails());
        assert_eq!(v.errors().count(), 1);
    }

    #[test]
    fn conditional_rules_apply_only_when_condition_holds() {
        let data = record(serde_json::json!({ "kind": "business", "vat": "x" }));
        let mut v = Validator::new(data, Vec::new());
        v.sometimes("vat", vec![failing("digits")], |record| {
            record.get("kind").and_then(serde_json::Value::as_str) == Some("business")
        });
        assert!(v.fails());

        let data = record(serde_json::json!({ "kind": "personal", "vat": "x" }));
        let mut v = Validator::new(data, Vec::new());
        v.sometimes("vat", vec![failing("digits")], |record| {
            record.get("kind").and_then(serde_json::Value::as_str) == Some("business")
        });
        assert!(v.passes());
    }

    #[test]
    fn valid_and_invalid_partition_top_level_fields() {
        let data = record(serde_json::json!({ "good": 1, "bad": "x" }));
        let mut v = Validator::new(data, Vec::new());
        v.add_rule("bad", failing("alpha"));
        let valid = v.valid();
        assert!(valid.contains_key("good"));
        assert!(!valid.contains_key("bad"));
        let invalid = v.invalid();
        assert!(invalid.contains_key("bad"));
        assert_eq!(invalid.len(), 1);
    }
}
