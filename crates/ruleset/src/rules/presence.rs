//! Presence rules: `required` and `optional`.

use serde_json::Value;

use crate::args::RuleArgs;
use crate::outcome::RuleOutcome;

/// Passes unless the value is absent or `null`.
pub fn required(value: Option<&Value>, _args: &RuleArgs) -> RuleOutcome {
    value.is_some_and(|v| !v.is_null()).into()
}

/// Always passes.
///
/// Marks a field as non-mandatory while other rules paired with it still
/// run and report.
pub fn optional(_value: Option<&Value>, _args: &RuleArgs) -> RuleOutcome {
    RuleOutcome::Pass
}
