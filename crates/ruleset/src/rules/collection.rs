//! Collection rules: `array` and `in`.

use serde_json::Value;

use crate::args::RuleArgs;
use crate::coerce::{as_i64, loose_eq, truthy};
use crate::outcome::RuleOutcome;

/// Passes maps and lists that satisfy every supplied constraint.
///
/// - `has`: list of keys, at least one of which must hold a non-null entry
/// - `empty`: when falsy, an empty collection fails
/// - `max_count` / `min_count` / `count`: element-count bounds, ignored
///   unless `> 0`
///
/// A `has` argument that is not a list is indeterminate.
pub fn array(value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
    let Some(collection) = value else {
        return RuleOutcome::Fail;
    };
    let count = match collection {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => return RuleOutcome::Fail,
    } as i64;

    if let Some(keys) = args.get_set("has") {
        let Value::Array(keys) = keys else {
            return RuleOutcome::Indeterminate;
        };
        if !keys.iter().any(|key| holds_key(collection, key)) {
            return RuleOutcome::Fail;
        }
    }

    if args.get_set("empty").is_some_and(|empty| !truthy(empty)) && count == 0 {
        return RuleOutcome::Fail;
    }

    let bound = |key: &str| -> Result<Option<i64>, ()> {
        match args.get_set(key) {
            None => Ok(None),
            Some(raw) => as_i64(raw).map(|n| (n > 0).then_some(n)).ok_or(()),
        }
    };
    let (Ok(max_count), Ok(min_count), Ok(exact)) =
        (bound("max_count"), bound("min_count"), bound("count"))
    else {
        return RuleOutcome::Indeterminate;
    };

    if max_count.is_some_and(|max| count > max) {
        return RuleOutcome::Fail;
    }
    if min_count.is_some_and(|min| count < min) {
        return RuleOutcome::Fail;
    }
    if exact.is_some_and(|exact| count != exact) {
        return RuleOutcome::Fail;
    }

    RuleOutcome::Pass
}

/// Whether `collection` holds a non-null entry under `key`.
///
/// Map keys match by string form; list entries are addressed by index.
fn holds_key(collection: &Value, key: &Value) -> bool {
    let key = match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => u8::from(*b).to_string(),
        _ => return false,
    };
    let entry = match collection {
        Value::Object(map) => map.get(&key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    };
    entry.is_some_and(|v| !v.is_null())
}

/// Passes when the value equals one of the argument collection's values.
///
/// Numbers and numeric strings compare by value, so query parameters
/// (always strings) can match numeric choices.
///
/// The arguments themselves are the collection: `["a", "b"]` or
/// `{"first": "a", "second": "b"}`.
pub fn one_of(value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
    let Some(value) = value else {
        return RuleOutcome::Fail;
    };
    args.values().any(|candidate| loose_eq(value, candidate)).into()
}
