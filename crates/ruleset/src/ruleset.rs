//! Declarative rule sets.
//!
//! A [`RuleSet`] maps field paths to a [`RuleSpec`]. Its data form is
//! plain JSON:
//!
//! ```json
//! {
//!     "email": "required",
//!     "user.name": {"0": "required", "string": {"min_length": 3}},
//!     "tags": ["optional", "array"]
//! }
//! ```
//!
//! A string applies one rule with empty arguments. A map applies several:
//! entries whose value is a string are shorthand for that rule with empty
//! arguments, every other entry is `rule name -> arguments`. A list reads
//! as a map keyed by position. Anything else is kept as
//! [`RuleSpec::Malformed`] and reported as indeterminate.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::args::RuleArgs;
use crate::error::{RuleSetError, kind_of};

// ============================================================================
// RULE ENTRY
// ============================================================================

/// One rule inside a multi-rule field.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEntry {
    /// `"<key>": "<rule>"`: apply `rule` with empty arguments.
    Shorthand {
        /// Key the entry was stored under, usually positional.
        key: String,
        /// Rule to apply.
        rule: String,
    },
    /// `"<rule>": {...}`: apply `rule` with the given arguments.
    WithArgs {
        /// Rule to apply.
        rule: String,
        /// Arguments passed to the rule.
        args: RuleArgs,
    },
    /// `"<rule>": 5`: arguments that are neither a map nor a list.
    InvalidArgs {
        /// Rule that was named.
        rule: String,
        /// The rejected arguments, kept verbatim.
        raw: Value,
    },
}

impl RuleEntry {
    fn from_pair(key: String, value: Value) -> Self {
        match value {
            Value::String(rule) => Self::Shorthand { key, rule },
            other => match RuleArgs::try_from(other.clone()) {
                Ok(args) => Self::WithArgs { rule: key, args },
                Err(_) => Self::InvalidArgs {
                    rule: key,
                    raw: other,
                },
            },
        }
    }

    /// Name of the rule this entry applies.
    pub fn rule(&self) -> &str {
        match self {
            Self::Shorthand { rule, .. }
            | Self::WithArgs { rule, .. }
            | Self::InvalidArgs { rule, .. } => rule,
        }
    }

    fn key(&self) -> &str {
        match self {
            Self::Shorthand { key, .. } => key,
            Self::WithArgs { rule, .. } | Self::InvalidArgs { rule, .. } => rule,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Shorthand { rule, .. } => Value::String(rule.clone()),
            Self::WithArgs { args, .. } => args.as_value().clone(),
            Self::InvalidArgs { raw, .. } => raw.clone(),
        }
    }
}

// ============================================================================
// RULE SPEC
// ============================================================================

/// The rules attached to one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RuleSpec {
    /// One rule, empty arguments. Reported as a bare outcome.
    Single(String),
    /// Several rules. Reported as a rule name to outcome map.
    Multi(Vec<RuleEntry>),
    /// A spec of any other shape.
    Malformed(Value),
}

impl RuleSpec {
    /// Returns `true` for [`RuleSpec::Malformed`].
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// Names of the rules this spec applies, in order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        let (single, multi) = match self {
            Self::Single(rule) => (Some(rule.as_str()), None),
            Self::Multi(entries) => (None, Some(entries.iter().map(RuleEntry::rule))),
            Self::Malformed(_) => (None, None),
        };
        single.into_iter().chain(multi.into_iter().flatten())
    }

    fn into_entries(self) -> Vec<RuleEntry> {
        match self {
            Self::Multi(entries) => entries,
            Self::Single(rule) => vec![RuleEntry::Shorthand {
                key: "0".to_owned(),
                rule,
            }],
            Self::Malformed(_) => Vec::new(),
        }
    }
}

impl From<Value> for RuleSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::String(rule) => Self::Single(rule),
            Value::Object(map) => Self::Multi(
                map.into_iter()
                    .map(|(key, value)| RuleEntry::from_pair(key, value))
                    .collect(),
            ),
            Value::Array(items) => Self::Multi(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| RuleEntry::from_pair(i.to_string(), value))
                    .collect(),
            ),
            other => Self::Malformed(other),
        }
    }
}

impl From<RuleSpec> for Value {
    fn from(spec: RuleSpec) -> Self {
        match spec {
            RuleSpec::Single(rule) => Self::String(rule),
            RuleSpec::Multi(entries) => Self::Object(
                entries
                    .iter()
                    .map(|entry| (entry.key().to_owned(), entry.to_value()))
                    .collect(),
            ),
            RuleSpec::Malformed(raw) => raw,
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(rule: &str) -> Self {
        Self::Single(rule.to_owned())
    }
}

// ============================================================================
// RULE SET
// ============================================================================

/// Field paths mapped to the rules that apply to them, in insertion order.
///
/// # Examples
///
/// ```
/// use nebula_ruleset::{RuleArgs, RuleSet};
/// use serde_json::json;
///
/// let built = RuleSet::new()
///     .single("email", "required")
///     .rule("user.name", "string", RuleArgs::new().with("min_length", 3));
///
/// let loaded = RuleSet::from_json(
///     r#"{"email": "required", "user.name": {"string": {"min_length": 3}}}"#,
/// )
/// .unwrap();
///
/// assert_eq!(built, loaded);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct RuleSet {
    fields: IndexMap<String, RuleSpec>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule set from its JSON data form.
    pub fn from_value(value: Value) -> Result<Self, RuleSetError> {
        match value {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(field, spec)| (field, RuleSpec::from(spec)))
                .collect()),
            other => Err(RuleSetError::NotAMap {
                kind: kind_of(&other),
            }),
        }
    }

    /// Parses a rule set from JSON text.
    pub fn from_json(text: &str) -> Result<Self, RuleSetError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Applies `rule` to `field`, replacing whatever the field had.
    #[must_use = "builder methods must be chained or built"]
    pub fn single(mut self, field: impl Into<String>, rule: impl Into<String>) -> Self {
        self.fields
            .insert(field.into(), RuleSpec::Single(rule.into()));
        self
    }

    /// Adds `rule` with `args` to `field`, making it a multi-rule field.
    ///
    /// A rule already present on the field is replaced in place.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, field: impl Into<String>, rule: impl Into<String>, args: RuleArgs) -> Self {
        let rule = rule.into();
        self.update_entries(field.into(), |entries| {
            let entry = RuleEntry::WithArgs {
                rule: rule.clone(),
                args,
            };
            match entries.iter_mut().find(|e| e.key() == rule) {
                Some(existing) => *existing = entry,
                None => entries.push(entry),
            }
        });
        self
    }

    /// Adds `rule` with empty arguments to `field`, making it a multi-rule
    /// field.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule_bare(mut self, field: impl Into<String>, rule: impl Into<String>) -> Self {
        let rule = rule.into();
        self.update_entries(field.into(), |entries| {
            let key = (0..)
                .map(|i: usize| i.to_string())
                .find(|key| entries.iter().all(|e| e.key() != key))
                .unwrap_or_default();
            entries.push(RuleEntry::Shorthand { key, rule });
        });
        self
    }

    fn update_entries(&mut self, field: String, update: impl FnOnce(&mut Vec<RuleEntry>)) {
        let spec = self
            .fields
            .entry(field)
            .or_insert_with(|| RuleSpec::Multi(Vec::new()));
        let mut entries = std::mem::replace(spec, RuleSpec::Multi(Vec::new())).into_entries();
        update(&mut entries);
        *spec = RuleSpec::Multi(entries);
    }

    /// Sets the spec of `field` directly.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, field: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        self.fields.insert(field.into(), spec.into());
        self
    }

    /// Returns the spec attached to `field`.
    pub fn get(&self, field: &str) -> Option<&RuleSpec> {
        self.fields.get(field)
    }

    /// Iterates fields and their specs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.fields.iter().map(|(field, spec)| (field.as_str(), spec))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no field has rules.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, RuleSpec)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, RuleSpec)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<Value> for RuleSet {
    type Error = RuleSetError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<RuleSet> for Value {
    fn from(set: RuleSet) -> Self {
        Self::Object(
            set.fields
                .into_iter()
                .map(|(field, spec)| (field, Self::from(spec)))
                .collect::<Map<String, Value>>(),
        )
    }
}
