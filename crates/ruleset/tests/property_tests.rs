//! Property-based tests for nebula-ruleset.

use nebula_ruleset::prelude::*;
use nebula_ruleset::{path, rules};
use proptest::prelude::*;
use serde_json::{Value, json};

fn args(value: Value) -> RuleArgs {
    RuleArgs::try_from(value).unwrap()
}

// ============================================================================
// NUMERIC: bounds and decimals
// ============================================================================

proptest! {
    #[test]
    fn numeric_passes_iff_within_bounds(
        v in -1_000_000i64..1_000_000,
        a in -1_000_000i64..1_000_000,
        b in -1_000_000i64..1_000_000,
    ) {
        let (min, max) = (a.min(b), a.max(b));
        let outcome = rules::numeric(Some(&json!(v)), &args(json!({"min": min, "max": max})));
        prop_assert_eq!(outcome.is_pass(), min <= v && v <= max);
    }

    #[test]
    fn numeric_string_bounds_match_numbers(
        v in -10_000i64..10_000,
        min in -10_000i64..10_000,
    ) {
        let bounds = args(json!({"min": min}));
        prop_assert_eq!(
            rules::numeric(Some(&json!(v.to_string())), &bounds),
            rules::numeric(Some(&json!(v)), &bounds)
        );
    }

    #[test]
    fn numeric_decimals_counts_fraction_digits(
        whole in 0u32..100_000,
        fraction in "[0-9]{0,8}",
        decimals in 0i64..10,
    ) {
        let text = if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{fraction}")
        };
        let outcome = rules::numeric(Some(&json!(text)), &args(json!({"decimals": decimals})));
        prop_assert_eq!(outcome.is_pass(), fraction.len() as i64 >= decimals);
    }
}

// ============================================================================
// STRING: character-aware lengths
// ============================================================================

proptest! {
    #[test]
    fn max_length_counts_characters(s in "\\PC{0,24}", max in 1i64..32) {
        let outcome = rules::string(Some(&json!(s)), &args(json!({"max_length": max})));
        prop_assert_eq!(outcome.is_pass(), s.chars().count() as i64 <= max);
    }

    #[test]
    fn single_byte_encodings_count_bytes(s in "\\PC{1,24}") {
        let exact = args(json!({"length": s.len(), "encoding": "ISO-8859-1"}));
        prop_assert_eq!(rules::string(Some(&json!(s)), &exact), RuleOutcome::Pass);
    }
}

// ============================================================================
// IN: membership
// ============================================================================

proptest! {
    #[test]
    fn in_passes_iff_member(
        items in prop::collection::vec("[a-z]{1,4}", 0..8),
        candidate in "[a-z]{1,4}",
    ) {
        let collection = args(json!(items));
        let outcome = rules::one_of(Some(&json!(candidate)), &collection);
        prop_assert_eq!(outcome.is_pass(), items.contains(&candidate));
    }
}

// ============================================================================
// PATH AND VALIDATOR
// ============================================================================

proptest! {
    #[test]
    fn set_then_get_round_trips(
        segments in prop::collection::vec("[a-z]{1,5}", 1..5),
        leaf in any::<i64>(),
    ) {
        let dotted = segments.join(".");
        let mut data = json!({});
        path::set(&mut data, &dotted, json!(leaf));
        prop_assert_eq!(path::get(&data, &dotted), Some(&json!(leaf)));
        prop_assert!(path::has(&data, &dotted));
    }

    #[test]
    fn validation_is_deterministic(age in any::<i32>(), name in "\\PC{0,12}") {
        let validator = Validator::new(json!({"user": {"age": age, "name": name}}));
        let set = RuleSet::from_value(json!({
            "user.age": {"integer": {"min": 0, "max": 150}},
            "user.name": ["required", "string"]
        }))
        .unwrap();

        let first = validator.validate(&set);
        prop_assert_eq!(&first, &validator.validate(&set));
        prop_assert_eq!(first.success(), (0..=150).contains(&age));
    }
}
