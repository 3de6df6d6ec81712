//! Error types.
//!
//! Rule evaluation never fails: malformed invocations surface as
//! [`RuleOutcome::Indeterminate`](crate::RuleOutcome::Indeterminate). The
//! errors here cover the edges around evaluation: registering custom rules
//! and loading rule sets.

/// Which registry already owns a rule name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOrigin {
    /// One of the built-in rules.
    Builtin,
    /// A rule previously added to this validator.
    Custom,
}

impl std::fmt::Display for RuleOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Builtin => "built-in",
            Self::Custom => "custom",
        })
    }
}

/// Errors raised when registering a custom rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The name is already taken; existing rules are never replaced.
    #[error("rule `{name}` is already registered as a {origin} rule")]
    NameTaken {
        /// The rejected name.
        name: String,
        /// The registry holding the existing rule.
        origin: RuleOrigin,
    },

    /// Rule names must be non-empty.
    #[error("rule name must not be empty")]
    EmptyName,
}

/// Errors raised when loading a rule set from data.
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    /// The document root is not a field-to-rules map.
    #[error("rule set must be a map of field paths to rules, got {kind}")]
    NotAMap {
        /// JSON type name of the rejected root.
        kind: &'static str,
    },

    /// The document is not valid JSON.
    #[error("rule set is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON type name, for error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
