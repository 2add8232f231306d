//! The rule registry: the catalogue of constructors, shared compiled
//! patterns, and the compilation step that turns parsed rule text into a
//! runnable [`Validator`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::engine::{CompiledRule, Establishes, FieldChain, Validator};
use crate::error::{BuildError, ParamError};
use crate::grammar::{self, RawRule};
use crate::rule::Rule;
use crate::rules;
use crate::Record;

/// Registry-scoped settings consulted by rule constructors, e.g. to loosen
/// a format check. Plain key/value, no schema.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: Record,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn unset(&mut self, key: &str) {
        self.values.remove(key);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The setting as a boolean, `false` when unset or non-boolean.
    #[must_use]
    pub fn is_enabled(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(Value::Bool(true)))
    }
}

/// Format patterns compiled once per registry and shared by every
/// constructor through [`BuildContext`]. Registry-owned rather than global
/// so two registries never contend.
#[derive(Debug)]
pub struct Patterns {
    pub email: Regex,
    pub uuid: Regex,
    pub ulid: Regex,
    pub hex_color: Regex,
    pub mac_address: Regex,
    pub url: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            email: compiled(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$"),
            uuid: compiled(
                r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
            ),
            ulid: compiled(r"^[0-7][0-9A-HJKMNP-TV-Za-hjkmnp-tv-z]{25}$"),
            hex_color: compiled(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$"),
            // Two homogeneous alternatives rather than a backreference on
            // the separator; `regex` has no backreferences.
            mac_address: compiled(
                r"^(?:[0-9a-fA-F]{2}:){5}[0-9a-fA-F]{2}$|^(?:[0-9a-fA-F]{2}-){5}[0-9a-fA-F]{2}$",
            ),
            url: compiled(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s/$.?#].[^\s]*$"),
        }
    }
}

// All patterns are fixed literals validated by the tests below.
fn compiled(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

/// Everything a rule constructor may consult besides its own parameters.
pub struct BuildContext<'a> {
    config: &'a Config,
    patterns: &'a Arc<Patterns>,
}

impl BuildContext<'_> {
    #[must_use]
    pub fn config(&self) -> &Config {
        self.config
    }

    /// The registry's shared compiled patterns. Constructors clone the
    /// `Arc`, not the regexes.
    #[must_use]
    pub fn patterns(&self) -> &Arc<Patterns> {
        self.patterns
    }
}

/// A rule constructor: parameters in, runnable rule out.
pub type RuleConstructor =
    Arc<dyn Fn(&BuildContext<'_>, &[String]) -> Result<Box<dyn Rule>, ParamError> + Send + Sync>;

/// The catalogue of rule constructors plus compilation into sessions.
///
/// A registry is built once, optionally extended with custom rules, and then
/// shared: it is read-only during [`make`](Registry::make) and the sessions
/// it produces own all their mutable state, so one registry can serve many
/// threads.
pub struct Registry {
    constructors: HashMap<String, RuleConstructor>,
    numeric_rules: HashSet<String>,
    config: Config,
    patterns: Arc<Patterns>,
}

impl Registry {
    /// A registry with the full built-in catalogue installed.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            constructors: HashMap::new(),
            numeric_rules: ["numeric", "integer", "int", "decimal"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            config: Config::new(),
            patterns: Arc::new(Patterns::new()),
        };
        rules::install(&mut registry);
        registry
    }

    /// Registers a constructor under a name, replacing any built-in of the
    /// same name. Names are matched case-insensitively.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&BuildContext<'_>, &[String]) -> Result<Box<dyn Rule>, ParamError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors
            .insert(name.into().to_lowercase(), Arc::new(constructor));
    }

    /// Marks a rule name as numeric-establishing, so chains declaring it
    /// size string values by parsed magnitude. `numeric`, `integer`, `int`
    /// and `decimal` are pre-marked.
    pub fn declare_numeric(&mut self, name: impl Into<String>) {
        self.numeric_rules.insert(name.into().to_lowercase());
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.constructors.contains_key(&name.to_lowercase())
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Compiles a ruleset against a record into a runnable session.
    ///
    /// # Errors
    ///
    /// Fails when `data` is not a JSON object, a rule name is unknown, or a
    /// constructor rejects its parameters. Nothing about the data values is
    /// inspected here.
    pub fn make<I, F, S>(&self, data: Value, ruleset: I) -> Result<Validator, BuildError>
    where
        I: IntoIterator<Item = (F, S)>,
        F: AsRef<str>,
        S: AsRef<str>,
    {
        let parsed = ruleset
            .into_iter()
            .map(|(field, text)| (field, grammar::parse_field_spec(text.as_ref())));
        self.make_parsed(data, parsed)
    }

    /// [`make`](Registry::make) for rulesets that are already parsed.
    ///
    /// # Errors
    ///
    /// Same conditions as [`make`](Registry::make).
    pub fn make_parsed<I, F>(&self, data: Value, ruleset: I) -> Result<Validator, BuildError>
    where
        I: IntoIterator<Item = (F, Vec<RawRule>)>,
        F: AsRef<str>,
    {
        let Value::Object(record) = data else {
            return Err(BuildError::NonObjectData);
        };
        let mut chains = Vec::new();
        for (field, raw) in ruleset {
            chains.push(self.compile_chain(field.as_ref(), &raw)?);
        }
        let rules: usize = chains.iter().map(|chain| chain.rules.len()).sum();
        debug!(fields = chains.len(), rules, "compiled field chains");
        Ok(Validator::new(record, chains))
    }

    /// Constructs a single rule outside of chain compilation, for use with
    /// [`Validator::add_rule`] and [`Validator::sometimes`]. The field name
    /// is only for error reporting.
    ///
    /// # Errors
    ///
    /// Fails when the name is unknown or the constructor rejects the
    /// parameters.
    pub fn build_rule(&self, field: &str, raw: &RawRule) -> Result<Box<dyn Rule>, BuildError> {
        let Some(constructor) = self.constructors.get(&raw.name) else {
            return Err(BuildError::UnknownRule {
                rule: raw.name.clone(),
                field: field.to_string(),
            });
        };
        let context = BuildContext {
            config: &self.config,
            patterns: &self.patterns,
        };
        constructor(&context, &raw.params).map_err(|err| BuildError::BadParameter {
            rule: raw.name.clone(),
            field: field.to_string(),
            reason: err.0,
        })
    }

    fn compile_chain(&self, field: &str, raw: &[RawRule]) -> Result<FieldChain, BuildError> {
        let mut chain = FieldChain::new(field);
        for invocation in raw {
            match invocation.name.as_str() {
                // Chain modifiers compile to flags, not runnable rules.
                "bail" => chain.bail = true,
                "sometimes" => chain.sometimes = true,
                "nullable" => chain.nullable = true,
                name => {
                    let rule = self.build_rule(field, invocation)?;
                    let establishes = self.establishes(name);
                    if establishes.is_some() {
                        chain.declares_numeric = true;
                    }
                    chain.rules.push(CompiledRule { rule, establishes });
                }
            }
        }
        Ok(chain)
    }

    fn establishes(&self, name: &str) -> Option<Establishes> {
        match name {
            "integer" | "int" => Some(Establishes::Integer),
            _ if self.numeric_rules.contains(name) => Some(Establishes::Numeric),
            _ => None,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
