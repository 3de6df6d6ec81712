use nebula_ruleset::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn validates_form_submission() {
    let validator = RequestParams::from_form(
        b"user%5Bname%5D=Alice&user%5Bage%5D=30&roles%5B%5D=admin&roles%5B%5D=dev",
    )
    .into_validator();

    let set = RuleSet::from_json(
        r#"{
            "user.name": {"0": "required", "string": {"min_length": 3}},
            "user.age": {"integer": {"min": 18}},
            "roles": {"array": {"has": ["0"], "max_count": 3}}
        }"#,
    )
    .unwrap();

    // Form values are strings, and `integer` only accepts numbers.
    let report = validator.validate(&set);
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "user.name": {"required": "pass", "string": "pass"},
            "user.age": {"integer": "fail"},
            "roles": {"array": "pass"}
        })
    );
}

#[test]
fn query_numbers_are_numeric_strings() {
    let validator = RequestParams::from_query("age=17&price=9.99").into_validator();
    let set = RuleSet::from_json(
        r#"{"age": {"numeric": {"min": 18}}, "price": {"numeric": {"decimals": 2}}}"#,
    )
    .unwrap();

    let report = validator.validate(&set);
    assert_eq!(report.get("age").and_then(|f| f.rule("numeric")), Some(RuleOutcome::Fail));
    assert_eq!(report.get("price").and_then(|f| f.rule("numeric")), Some(RuleOutcome::Pass));
}

#[test]
fn request_encoding_applies_unless_overridden() {
    // "日本" is two characters, six UTF-8 bytes.
    let validator = RequestParams::from_query("city=%E6%97%A5%E6%9C%AC")
        .with_input_encoding("8bit")
        .into_validator();

    let by_default = RuleSet::from_json(r#"{"city": {"string": {"max_length": 2}}}"#).unwrap();
    assert!(validator.failed(&by_default));

    let explicit = RuleSet::from_json(
        r#"{"city": {"string": {"max_length": 2, "encoding": "UTF-8"}}}"#,
    )
    .unwrap();
    assert!(validator.success(&explicit));
}

#[test]
fn each_request_gets_its_own_validator() {
    let mut first = RequestParams::from_query("n=2").into_validator();
    let second = RequestParams::from_query("n=2").into_validator();

    assert!(first.add_rule("even", |value, _| {
        value
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<i64>().ok())
            .is_some_and(|n| n % 2 == 0)
    }));
    assert!(first.rule_exists("even"));
    assert!(!second.rule_exists("even"));
}

#[test]
fn query_values_match_numeric_choices() {
    let validator = RequestParams::from_query("page=2&sort=name").into_validator();
    let set = RuleSet::from_json(
        r#"{"page": {"in": [1, 2, 3]}, "sort": {"in": [1, 2, 3]}}"#,
    )
    .unwrap();

    let report = validator.validate(&set);
    assert_eq!(report.get("page").and_then(|f| f.rule("in")), Some(RuleOutcome::Pass));
    assert_eq!(report.get("sort").and_then(|f| f.rule("in")), Some(RuleOutcome::Fail));
}
