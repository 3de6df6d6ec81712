//! # nebula-ruleset
//!
//! Declarative rule-set validation over loosely-typed, nested request data.
//!
//! A [`Validator`] wraps one data snapshot. A [`RuleSet`] names, per
//! dot-delimited field path, one or more rules to apply. Validation never
//! fails: every rule yields a tri-state [`RuleOutcome`], and malformed
//! invocations (unknown rule, badly shaped arguments, invalid pattern)
//! come back as [`RuleOutcome::Indeterminate`].
//!
//! ## Quick Start
//!
//! ```rust
//! use nebula_ruleset::prelude::*;
//! use serde_json::json;
//!
//! let validator = Validator::new(json!({"user": {"name": "Al", "age": 15}}));
//! let rules = RuleSet::from_json(r#"{
//!     "user.name": {"string": {"min_length": 3}},
//!     "user.age": {"numeric": {"min": 18}}
//! }"#).unwrap();
//!
//! let report = validator.validate(&rules);
//! assert_eq!(
//!     serde_json::to_value(&report).unwrap(),
//!     json!({"user.name": {"string": "fail"}, "user.age": {"numeric": "fail"}})
//! );
//! assert!(!report.success());
//! ```
//!
//! ## Rules
//!
//! Built-in rules live in [`rules`]. Custom rules are closures or [`Rule`]
//! implementations registered with [`Validator::add_rule`]; their names
//! may not collide with built-in or previously registered rules.
//!
//! ## Features
//!
//! - `request` (default): the [`request`] adapter for query strings and
//!   urlencoded form bodies.

mod args;
mod cache;
mod coerce;
mod error;
mod outcome;
pub mod path;
pub mod prelude;
mod registry;
mod report;
#[cfg(feature = "request")]
pub mod request;
pub mod rules;
mod ruleset;
mod validator;

pub use args::{InvalidArgs, RuleArgs};
pub use error::{RegistryError, RuleOrigin, RuleSetError};
pub use outcome::RuleOutcome;
pub use registry::{Rule, RuleRegistry};
pub use report::{FieldReport, ValidationReport};
pub use ruleset::{RuleEntry, RuleSet, RuleSpec};
pub use validator::Validator;
