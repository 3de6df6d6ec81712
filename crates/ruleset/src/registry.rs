//! Custom rule registry and rule dispatch.
//!
//! Each validator owns a [`RuleRegistry`] of custom rules. Custom names
//! are disjoint from the built-in names: registration is refused for any
//! name either side already holds, so a registered rule can never shadow
//! or replace another.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::args::RuleArgs;
use crate::error::{RegistryError, RuleOrigin};
use crate::outcome::RuleOutcome;
use crate::rules;

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A named check applied to one value.
///
/// Any `Fn(Option<&Value>, &RuleArgs) -> O` closure is a rule when `O`
/// converts into a [`RuleOutcome`]: `bool` maps to pass/fail, and
/// `Option<bool>` additionally maps `None` to indeterminate.
///
/// # Examples
///
/// ```
/// use nebula_ruleset::{Rule, RuleArgs, RuleOutcome};
/// use serde_json::{Value, json};
///
/// struct Even;
///
/// impl Rule for Even {
///     fn check(&self, value: Option<&Value>, _args: &RuleArgs) -> RuleOutcome {
///         value.and_then(Value::as_i64).is_some_and(|n| n % 2 == 0).into()
///     }
/// }
///
/// assert_eq!(Even.check(Some(&json!(4)), &RuleArgs::new()), RuleOutcome::Pass);
/// ```
pub trait Rule: Send + Sync {
    /// Applies the rule. Must not panic for any input.
    fn check(&self, value: Option<&Value>, args: &RuleArgs) -> RuleOutcome;
}

impl<F, O> Rule for F
where
    F: Fn(Option<&Value>, &RuleArgs) -> O + Send + Sync,
    O: Into<RuleOutcome>,
{
    #[inline]
    fn check(&self, value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
        self(value, args).into()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Per-validator store of custom rules.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    custom: HashMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom rule under `name`.
    ///
    /// Fails if `name` is empty or already used by a built-in or custom
    /// rule. The existing rule is left untouched.
    pub fn register(&mut self, name: &str, rule: Arc<dyn Rule>) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if let Some(origin) = self.origin(name) {
            tracing::debug!(rule = name, %origin, "refusing to register rule: name taken");
            return Err(RegistryError::NameTaken {
                name: name.to_owned(),
                origin,
            });
        }

        self.custom.insert(name.to_owned(), rule);
        tracing::debug!(rule = name, "registered custom rule");
        Ok(())
    }

    /// Returns which registry holds `name`, custom first.
    pub fn origin(&self, name: &str) -> Option<RuleOrigin> {
        if self.custom.contains_key(name) {
            Some(RuleOrigin::Custom)
        } else if rules::is_builtin(name) {
            Some(RuleOrigin::Builtin)
        } else {
            None
        }
    }

    /// Returns `true` if `name` resolves to a custom or built-in rule.
    pub fn contains(&self, name: &str) -> bool {
        self.origin(name).is_some()
    }

    /// Returns `true` if `name` is a custom rule of this registry.
    pub fn is_custom(&self, name: &str) -> bool {
        self.custom.contains_key(name)
    }

    /// Iterates the custom rule names, in no particular order.
    pub fn custom_names(&self) -> impl Iterator<Item = &str> {
        self.custom.keys().map(String::as_str)
    }

    /// Number of custom rules.
    pub fn len(&self) -> usize {
        self.custom.len()
    }

    /// Returns `true` when no custom rules are registered.
    pub fn is_empty(&self) -> bool {
        self.custom.is_empty()
    }

    /// Resolves `name` and applies the rule.
    ///
    /// Custom rules are consulted first, then built-ins. Unknown names are
    /// indeterminate.
    pub fn dispatch(&self, name: &str, value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
        if let Some(rule) = self.custom.get(name) {
            tracing::trace!(rule = name, origin = "custom", "dispatching rule");
            return rule.check(value, args);
        }
        if let Some(rule) = rules::lookup(name) {
            tracing::trace!(rule = name, origin = "builtin", "dispatching rule");
            return rule(value, args);
        }

        tracing::warn!(rule = name, "unknown rule");
        RuleOutcome::Indeterminate
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.custom.keys().collect();
        names.sort();
        f.debug_struct("RuleRegistry")
            .field("custom", &names)
            .finish()
    }
}
