use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use nebula_ruleset::prelude::*;
use nebula_ruleset::{RegistryError, RuleOrigin, rules as builtin};
use serde_json::{Value, json};

fn is_even(value: Option<&Value>) -> bool {
    value.and_then(Value::as_i64).is_some_and(|n| n % 2 == 0)
}

#[test]
fn custom_rule_runs_once_per_referencing_field() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut validator = Validator::new(json!({"a": 2, "b": 3, "c": "x"}));

    let counter = Arc::clone(&calls);
    assert!(validator.add_rule("evenNumber", move |value, _args| {
        counter.fetch_add(1, Ordering::SeqCst);
        is_even(value)
    }));

    let set = RuleSet::from_json(r#"{"a": "evenNumber", "b": "evenNumber", "c": "required"}"#)
        .unwrap();
    let report = validator.validate(&set);

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(report.get("a"), Some(&RuleOutcome::Pass.into()));
    assert_eq!(report.get("b"), Some(&RuleOutcome::Fail.into()));
}

#[test]
fn second_registration_is_refused_and_first_kept() {
    let mut validator = Validator::new(json!({"n": 4}));
    assert!(validator.add_rule("evenNumber", |value, _| is_even(value)));
    assert!(!validator.add_rule("evenNumber", |_, _| false));

    assert_eq!(
        validator.check_path("n", "evenNumber", &RuleArgs::new()),
        RuleOutcome::Pass
    );
}

#[test]
fn builtin_names_are_reserved() {
    let mut validator = Validator::default();
    for name in builtin::names() {
        let err = validator.try_add_rule(name, |_, _| true).unwrap_err();
        assert_eq!(
            err,
            RegistryError::NameTaken {
                name: name.to_owned(),
                origin: RuleOrigin::Builtin,
            }
        );
    }
    assert!(validator.registry().is_empty());
}

#[test]
fn custom_rule_may_be_indeterminate() {
    let mut validator = Validator::new(json!({"n": "seven"}));
    validator
        .try_add_rule("parity", |value, _| value.and_then(Value::as_i64).map(|n| n % 2 == 0))
        .unwrap();

    assert_eq!(
        validator.check_path("n", "parity", &RuleArgs::new()),
        RuleOutcome::Indeterminate
    );
}

#[test]
fn custom_rule_receives_args() {
    let mut validator = Validator::new(json!({"n": 9}));
    validator.add_rule("divisible_by", |value, args| -> Option<bool> {
        let divisor = args.get("by").and_then(Value::as_i64)?;
        let n = value.and_then(Value::as_i64)?;
        (divisor != 0).then(|| n % divisor == 0)
    });

    let set = RuleSet::from_json(r#"{"n": {"divisible_by": {"by": 3}}}"#).unwrap();
    assert!(validator.success(&set));

    let zero = RuleSet::from_json(r#"{"n": {"divisible_by": {"by": 0}}}"#).unwrap();
    assert_eq!(
        validator.validate(&zero).get("n").and_then(|f| f.rule("divisible_by")),
        Some(RuleOutcome::Indeterminate)
    );
}

struct Slug;

impl Rule for Slug {
    fn check(&self, value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
        let args = args.clone().with("matches", "^[a-z0-9]+(?:-[a-z0-9]+)*$");
        builtin::check("string", value, &args)
    }
}

#[test]
fn trait_rules_can_wrap_builtins() {
    let mut validator = Validator::new(json!({"slug": "hello-world", "bad": "Hello World"}));
    validator.try_add_rule_impl("slug", Slug).unwrap();

    let set = RuleSet::from_json(r#"{"slug": {"slug": {"max_length": 20}}, "bad": "slug"}"#)
        .unwrap();
    let report = validator.validate(&set);

    assert_eq!(report.get("slug").and_then(|f| f.rule("slug")), Some(RuleOutcome::Pass));
    assert_eq!(report.get("bad"), Some(&RuleOutcome::Fail.into()));
}

#[test]
fn rule_exists_checks_both_registries() {
    let mut validator = Validator::default();
    assert!(validator.rule_exists("date"));
    assert!(!validator.rule_exists("slug"));

    validator.try_add_rule_impl("slug", Slug).unwrap();
    assert!(validator.rule_exists("slug"));
    assert!(!validator.rule_exists("Slug"));
}
