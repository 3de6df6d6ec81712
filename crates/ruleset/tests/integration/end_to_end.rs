use nebula_ruleset::prelude::*;
use nebula_ruleset::path;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn rules(value: Value) -> RuleSet {
    RuleSet::from_value(value).unwrap()
}

#[test]
fn underage_user_with_short_name() {
    let validator = Validator::new(json!({"user": {"name": "Al", "age": 15}}));
    let set = rules(json!({
        "user.name": {"string": {"min_length": 3}},
        "user.age": {"numeric": {"min": 18}}
    }));

    let report = validator.validate(&set);
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({"user.name": {"string": "fail"}, "user.age": {"numeric": "fail"}})
    );
    assert!(!validator.success(&set));
    assert!(validator.failed(&set));
}

#[test]
fn all_rules_pass() {
    let validator = Validator::new(json!({
        "user": {"name": "Alice", "age": 30, "email": "alice@example.com"},
        "tags": ["a", "b"],
        "server": {"ip": "10.0.0.1"},
        "created": "2024-01-31T10:00:00+00:00",
        "role": "admin"
    }));
    let set = rules(json!({
        "user.name": ["required", "string"],
        "user.age": {"integer": {"min": 18, "max": 120}},
        "user.email": {"string": {"matches": "^[^@]+@[^@]+$"}},
        "tags": {"array": {"empty": false, "max_count": 5}},
        "server.ip": "ip",
        "created": "date",
        "role": {"in": ["admin", "user"]},
        "nickname": "optional"
    }));

    let report = validator.validate(&set);
    assert!(report.success(), "unexpected report: {report:?}");
    assert_eq!(report.len(), 8);
}

#[test]
fn multi_rule_fields_recurse_in_success() {
    let validator = Validator::new(json!({"name": "Alice"}));
    let set = rules(json!({"name": {"0": "required", "string": {"max_length": 10}}}));

    let report = validator.validate(&set);
    assert_eq!(
        report.get("name"),
        Some(&FieldReport::Multi(
            [
                ("required".to_owned(), RuleOutcome::Pass),
                ("string".to_owned(), RuleOutcome::Pass),
            ]
            .into_iter()
            .collect()
        ))
    );
    assert!(report.success());
}

#[test]
fn absent_path_is_absent_and_required_fails() {
    let data = json!({"a": {}});
    assert_eq!(path::get(&data, "a.b.c"), None);

    let validator = Validator::new(data);
    assert_eq!(
        validator.check_path("a.b.c", "required", &RuleArgs::new()),
        RuleOutcome::Fail
    );
    assert_eq!(
        validator.check_path("a.b.c", "optional", &RuleArgs::new()),
        RuleOutcome::Pass
    );
}

#[test]
fn indeterminate_outcomes_fail_the_report() {
    let validator = Validator::new(json!({"name": "abc", "ip": "1.2.3.4"}));
    let set = rules(json!({
        "name": {"string": {"matches": "(unclosed"}},
        "ip": "no_such_rule",
        "other": null
    }));

    let report = validator.validate(&set);
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "name": {"string": "indeterminate"},
            "ip": "indeterminate",
            "other": "indeterminate"
        })
    );
    assert!(report.failed());
    assert_eq!(
        report.failed_fields().collect::<Vec<_>>(),
        ["name", "ip", "other"]
    );
}

#[test]
fn list_paths_reach_into_arrays() {
    let validator = Validator::new(json!({"items": [{"sku": "A-1"}, {"sku": ""}]}));
    let set = rules(json!({
        "items.0.sku": {"string": {"min_length": 1}},
        "items.1.sku": {"string": {"min_length": 1}}
    }));

    let report = validator.validate(&set);
    assert_eq!(report.get("items.0.sku").and_then(|f| f.rule("string")), Some(RuleOutcome::Pass));
    assert_eq!(report.get("items.1.sku").and_then(|f| f.rule("string")), Some(RuleOutcome::Fail));
}

#[test]
fn configured_rule_set_is_the_fallback() {
    let validator = Validator::new(json!({"age": "17"}))
        .with_rules(rules(json!({"age": {"numeric": {"min": 18}}})));

    assert!(validator.failed(&RuleSet::new()));
    assert!(validator.success(&rules(json!({"age": "numeric"}))));
}

#[test]
fn rule_sets_load_from_serde() {
    let set: RuleSet = serde_json::from_str(
        r#"{"email": "required", "age": {"integer": {"min": 0}}}"#,
    )
    .unwrap();
    assert_eq!(set.len(), 2);

    let validator = Validator::new(json!({"email": "x@y.z", "age": -1}));
    let report = validator.validate(&set);
    assert_eq!(report.get("email"), Some(&RuleOutcome::Pass.into()));
    assert_eq!(report.get("age").and_then(|f| f.rule("integer")), Some(RuleOutcome::Fail));
}
