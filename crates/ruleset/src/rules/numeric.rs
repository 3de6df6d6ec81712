//! Numeric rules: `integer`, `number`, `numeric`.
//!
//! `numeric` accepts JSON numbers and numeric strings and checks the
//! optional `min`, `max` and `decimals` arguments. `integer` and `number`
//! narrow the accepted input type and then defer to `numeric`.

use serde_json::Value;

use crate::args::RuleArgs;
use crate::coerce::{as_f64, as_i64};
use crate::outcome::RuleOutcome;

/// Passes integral JSON numbers within the `numeric` bounds.
///
/// Any `decimals` argument is forced to `0`.
pub fn integer(value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
    match value {
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => {
            numeric(value, &args.clone().with("decimals", 0))
        }
        _ => RuleOutcome::Fail,
    }
}

/// Passes JSON numbers (integral or floating point) within the `numeric`
/// bounds.
pub fn number(value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
    match value {
        Some(Value::Number(_)) => numeric(value, args),
        _ => RuleOutcome::Fail,
    }
}

/// Passes numbers and numeric strings that satisfy every supplied bound.
///
/// - `max`: value must not exceed it
/// - `min`: value must not be below it
/// - `decimals`: at least that many fractional digits must be present
///
/// A bound argument that is not numeric makes the outcome indeterminate.
pub fn numeric(value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
    let Some(value) = value else {
        return RuleOutcome::Fail;
    };
    let Some(number) = as_f64(value) else {
        return RuleOutcome::Fail;
    };

    if let Some(max) = args.get_set("max") {
        let Some(max) = as_f64(max) else {
            return RuleOutcome::Indeterminate;
        };
        if number > max {
            return RuleOutcome::Fail;
        }
    }

    if let Some(min) = args.get_set("min") {
        let Some(min) = as_f64(min) else {
            return RuleOutcome::Indeterminate;
        };
        if number < min {
            return RuleOutcome::Fail;
        }
    }

    if let Some(decimals) = args.get_set("decimals") {
        let Some(decimals) = as_i64(decimals) else {
            return RuleOutcome::Indeterminate;
        };
        if decimals > fractional_digits(value) as i64 {
            return RuleOutcome::Fail;
        }
    }

    RuleOutcome::Pass
}

/// Counts the digits after the decimal point in the value's textual form.
///
/// Strings are measured as written (`"1.50"` has two). Floats use their
/// shortest round-trip rendering, so `1.5` has one and `2.0` has none.
fn fractional_digits(value: &Value) -> usize {
    let text = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        _ => return 0,
    };
    let mantissa = text.split(['e', 'E']).next().unwrap_or_default();
    mantissa
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}
