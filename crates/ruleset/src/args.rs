//! Rule arguments.
//!
//! [`RuleArgs`] wraps the JSON value a rule set attaches to a rule name.
//! Most rules read named options from a map (`{"max": 10}`); the `in`
//! rule reads the collection itself (`["a", "b"]`), so lists are accepted
//! too.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::kind_of;

/// Options passed to a rule. Defaults to an empty map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct RuleArgs(Value);

/// Returned when a rule set attaches a scalar where arguments belong.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("rule arguments must be a map or a list, got {kind}")]
pub struct InvalidArgs {
    /// JSON type name of the rejected value.
    pub kind: &'static str,
}

impl RuleArgs {
    /// Creates empty arguments.
    pub fn new() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Returns the option stored under `key`.
    ///
    /// List arguments are addressed by index.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match &self.0 {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Returns the option under `key` unless it is missing or `null`.
    pub fn get_set(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }

    /// Iterates the collection's values: list elements or map values.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        let (list, map) = match &self.0 {
            Value::Array(items) => (Some(items.iter()), None),
            Value::Object(map) => (None, Some(map.values())),
            _ => (None, None),
        };
        list.into_iter().flatten().chain(map.into_iter().flatten())
    }

    /// Returns `true` when there are no options.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => true,
        }
    }

    /// Sets `key`, replacing any caller-supplied value.
    ///
    /// List arguments are converted to a map keyed by index first.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = self.into_map();
        map.insert(key.into(), value.into());
        Self(Value::Object(map))
    }

    /// Fills keys missing from `self` with the entries of `defaults`.
    ///
    /// Caller-supplied keys always win, including explicit `null`s.
    #[must_use]
    pub fn with_defaults(self, defaults: &RuleArgs) -> Self {
        let fallback = match &defaults.0 {
            Value::Object(fallback) if !fallback.is_empty() => fallback,
            _ => return self,
        };
        let mut map = self.into_map();
        for (key, value) in fallback {
            if !map.contains_key(key) {
                map.insert(key.clone(), value.clone());
            }
        }
        Self(Value::Object(map))
    }

    /// Borrows the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn into_map(self) -> Map<String, Value> {
        match self.0 {
            Value::Object(map) => map,
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => Map::new(),
        }
    }
}

impl Default for RuleArgs {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Value> for RuleArgs {
    type Error = InvalidArgs;

    /// `null` reads as "no arguments"; other scalars are rejected.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(_) | Value::Array(_) => Ok(Self(value)),
            other => Err(InvalidArgs {
                kind: kind_of(&other),
            }),
        }
    }
}

impl From<Map<String, Value>> for RuleArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(Value::Object(map))
    }
}

impl From<Vec<Value>> for RuleArgs {
    fn from(items: Vec<Value>) -> Self {
        Self(Value::Array(items))
    }
}

impl From<RuleArgs> for Value {
    fn from(args: RuleArgs) -> Self {
        args.0
    }
}
