//! Built-in rules
//!
//! Every built-in rule is a pure function of `(value, args)` returning a
//! [`RuleOutcome`]. The set is fixed at compile time; lookups go through a
//! table that is indexed once per process.
//!
//! | Name | Accepts | Arguments |
//! |---|---|---|
//! | `integer` | integral numbers | `min`, `max` |
//! | `number` | numbers | `min`, `max`, `decimals` |
//! | `numeric` | numbers, numeric strings | `min`, `max`, `decimals` |
//! | `string` | strings | `encoding`, `min_length`, `max_length`, `length`, `matches` |
//! | `array` | maps, lists | `has`, `empty`, `min_count`, `max_count`, `count` |
//! | `in` | anything | the collection itself |
//! | `required` | anything | none |
//! | `optional` | anything | none |
//! | `ip` | strings | `ipv6` |
//! | `date` | strings | `format` |
//!
//! # Examples
//!
//! ```
//! use nebula_ruleset::rules;
//! use nebula_ruleset::{RuleArgs, RuleOutcome};
//! use serde_json::json;
//!
//! let args = RuleArgs::try_from(json!({"max_length": 5})).unwrap();
//! let outcome = rules::check("string", Some(&json!("héllo")), &args);
//! assert_eq!(outcome, RuleOutcome::Pass);
//!
//! assert_eq!(rules::check("nope", None, &args), RuleOutcome::Indeterminate);
//! ```

pub mod collection;
pub mod date;
pub mod network;
pub mod numeric;
pub mod presence;
pub mod string;

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;

use crate::args::RuleArgs;
use crate::outcome::RuleOutcome;

pub use collection::{array, one_of};
pub use date::{DEFAULT_FORMAT, DateFormat, date};
pub use network::ip;
pub use numeric::{integer, number, numeric};
pub use presence::{optional, required};
pub use string::{DEFAULT_ENCODING, Encoding, string};

/// Signature shared by every built-in rule.
pub type BuiltinFn = fn(Option<&Value>, &RuleArgs) -> RuleOutcome;

/// The built-in rule table, in documentation order.
pub const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("integer", integer),
    ("number", number),
    ("numeric", numeric),
    ("string", string),
    ("array", array),
    ("in", one_of),
    ("required", required),
    ("optional", optional),
    ("ip", ip),
    ("date", date),
];

static INDEX: LazyLock<HashMap<&'static str, BuiltinFn>> =
    LazyLock::new(|| BUILTINS.iter().copied().collect());

/// Returns the built-in rule registered under `name`.
///
/// Names are case-sensitive.
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    INDEX.get(name).copied()
}

/// Returns `true` if `name` is a built-in rule.
pub fn is_builtin(name: &str) -> bool {
    INDEX.contains_key(name)
}

/// Iterates the built-in rule names.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _)| *name)
}

/// Applies the built-in rule `name`.
///
/// Unknown names are indeterminate. Custom rules use this to delegate to a
/// built-in with adjusted arguments.
pub fn check(name: &str, value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
    match lookup(name) {
        Some(rule) => rule(value, args),
        None => RuleOutcome::Indeterminate,
    }
}
