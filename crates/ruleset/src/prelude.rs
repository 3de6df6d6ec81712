//! Prelude module for convenient imports.
//!
//! `use nebula_ruleset::prelude::*;` brings in the validator, rule sets,
//! reports and the custom rule trait.

pub use crate::{
    FieldReport, Rule, RuleArgs, RuleOutcome, RuleSet, RuleSpec, ValidationReport, Validator,
};

#[cfg(feature = "request")]
pub use crate::request::{ParamSource, RequestParams};
