//! The [`Validator`] façade.
//!
//! A validator owns one data snapshot, an optional configured rule set,
//! its custom rules and per-rule default arguments. Validation reads the
//! snapshot and never changes it.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::args::RuleArgs;
use crate::error::{RegistryError, kind_of};
use crate::outcome::RuleOutcome;
use crate::path;
use crate::registry::{Rule, RuleRegistry};
use crate::report::{FieldReport, ValidationReport};
use crate::ruleset::{RuleEntry, RuleSet, RuleSpec};

/// Validates one data snapshot against rule sets.
///
/// # Examples
///
/// ```
/// use nebula_ruleset::{RuleOutcome, RuleSet, Validator};
/// use serde_json::json;
///
/// let mut validator = Validator::new(json!({"user": {"name": "Al", "age": 15}}));
/// validator.add_rule("even", |value, _args| {
///     value.and_then(|v| v.as_i64()).is_some_and(|n| n % 2 == 0)
/// });
///
/// let rules = RuleSet::from_json(r#"{
///     "user.name": {"string": {"min_length": 3}},
///     "user.age": "even"
/// }"#).unwrap();
///
/// let report = validator.validate(&rules);
/// assert_eq!(report.get("user.age"), Some(&RuleOutcome::Fail.into()));
/// assert!(validator.failed(&rules));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    data: Value,
    rules: RuleSet,
    registry: RuleRegistry,
    defaults: HashMap<String, RuleArgs>,
}

impl Validator {
    /// Creates a validator over `data`.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Sets the rule set used when `validate` is given an empty one.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Sets default arguments for every invocation of `rule`.
    ///
    /// Arguments supplied by the rule set win over these; defaults only fill
    /// missing keys. Repeated calls for the same rule merge, later values
    /// winning.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_rule_defaults(mut self, rule: impl Into<String>, defaults: RuleArgs) -> Self {
        let rule = rule.into();
        let merged = match self.defaults.remove(&rule) {
            Some(previous) => defaults.with_defaults(&previous),
            None => defaults,
        };
        self.defaults.insert(rule, merged);
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// The data snapshot.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Reads the value at a dot-delimited `path` of the snapshot.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path::get(&self.data, path)
    }

    /// Returns `true` if `path` resolves in the snapshot.
    pub fn has(&self, path: &str) -> bool {
        path::has(&self.data, path)
    }

    /// The configured rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Default arguments registered for `rule`.
    pub fn rule_defaults(&self, rule: &str) -> Option<&RuleArgs> {
        self.defaults.get(rule)
    }

    /// The custom rule registry.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    // ========================================================================
    // CUSTOM RULES
    // ========================================================================

    /// Registers a custom rule, returning `false` if `name` is taken.
    ///
    /// Built-in rules and earlier custom rules are never replaced.
    pub fn add_rule<F, O>(&mut self, name: &str, rule: F) -> bool
    where
        F: Fn(Option<&Value>, &RuleArgs) -> O + Send + Sync + 'static,
        O: Into<RuleOutcome>,
    {
        self.try_add_rule(name, rule).is_ok()
    }

    /// Registers a custom rule, reporting why a name was refused.
    pub fn try_add_rule<F, O>(&mut self, name: &str, rule: F) -> Result<(), RegistryError>
    where
        F: Fn(Option<&Value>, &RuleArgs) -> O + Send + Sync + 'static,
        O: Into<RuleOutcome>,
    {
        self.registry.register(name, Arc::new(rule))
    }

    /// Registers a custom rule implemented as a [`Rule`] type.
    pub fn try_add_rule_impl<R>(&mut self, name: &str, rule: R) -> Result<(), RegistryError>
    where
        R: Rule + 'static,
    {
        self.registry.register(name, Arc::new(rule))
    }

    /// Returns `true` if `name` is a custom or built-in rule.
    pub fn rule_exists(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    // ========================================================================
    // EVALUATION
    // ========================================================================

    /// Applies `rule` to `value`, filling in the rule's defaults.
    pub fn check(&self, rule: &str, value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
        match self.defaults.get(rule) {
            Some(defaults) => {
                let merged = args.clone().with_defaults(defaults);
                self.registry.dispatch(rule, value, &merged)
            }
            None => self.registry.dispatch(rule, value, args),
        }
    }

    /// Applies `rule` to the value at `path`.
    pub fn check_path(&self, path: &str, rule: &str, args: &RuleArgs) -> RuleOutcome {
        self.check(rule, self.get(path), args)
    }

    /// Validates the snapshot against `rules`.
    ///
    /// An empty `rules` falls back to the configured rule set. Fields are
    /// reported in rule-set order.
    pub fn validate(&self, rules: &RuleSet) -> ValidationReport {
        let rules = if rules.is_empty() {
            tracing::debug!(fields = self.rules.len(), "using configured rule set");
            &self.rules
        } else {
            rules
        };

        rules
            .iter()
            .map(|(field, spec)| (field.to_owned(), self.validate_field(field, spec)))
            .collect()
    }

    /// Returns `true` if every rule of every field passes.
    pub fn success(&self, rules: &RuleSet) -> bool {
        self.validate(rules).success()
    }

    /// Returns `true` if any rule of any field does not pass.
    pub fn failed(&self, rules: &RuleSet) -> bool {
        !self.success(rules)
    }

    fn validate_field(&self, field: &str, spec: &RuleSpec) -> FieldReport {
        let value = self.get(field);
        match spec {
            RuleSpec::Single(rule) => self.check(rule, value, &RuleArgs::new()).into(),
            RuleSpec::Multi(entries) => FieldReport::Multi(
                entries
                    .iter()
                    .map(|entry| (entry.rule().to_owned(), self.check_entry(field, entry, value)))
                    .collect(),
            ),
            RuleSpec::Malformed(raw) => {
                tracing::warn!(field, kind = kind_of(raw), "malformed rule spec");
                RuleOutcome::Indeterminate.into()
            }
        }
    }

    fn check_entry(&self, field: &str, entry: &RuleEntry, value: Option<&Value>) -> RuleOutcome {
        match entry {
            RuleEntry::Shorthand { rule, .. } => self.check(rule, value, &RuleArgs::new()),
            RuleEntry::WithArgs { rule, args } => self.check(rule, value, args),
            RuleEntry::InvalidArgs { rule, raw } => {
                tracing::warn!(field, rule = rule.as_str(), kind = kind_of(raw), "malformed rule arguments");
                RuleOutcome::Indeterminate
            }
        }
    }
}
