//! End-to-end behavior of the execution engine: chain control flow,
//! wildcard expansion, message rendering and session configuration.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use veto_validator::prelude::*;

fn make(data: serde_json::Value, ruleset: &[(&str, &str)]) -> Validator {
    Registry::new()
        .make(data, ruleset.iter().copied())
        .expect("ruleset compiles")
}

#[test]
fn ordinary_rules_skip_absent_and_null_values() {
    let mut v = make(
        json!({ "b": null }),
        &[("a", "email|min:5"), ("b", "integer")],
    );
    assert!(v.passes());
}

#[rstest]
#[case(json!({}), true)]
#[case(json!({ "f": "" }), true)]
#[case(json!({ "f": null }), true)]
#[case(json!({ "f": 0 }), false)]
#[case(json!({ "f": false }), false)]
fn required_distinguishes_empty_from_falsy(#[case] data: serde_json::Value, #[case] fails: bool) {
    let mut v = make(data, &[("f", "required")]);
    assert_eq!(v.fails(), fails);
}

#[test]
fn implicit_failure_halts_the_rest_of_the_chain() {
    let mut v = make(json!({}), &[("email", "required|email|min:5")]);
    assert!(v.fails());
    assert_eq!(
        v.errors().get("email"),
        ["The email field is required."]
    );
}

#[test]
fn non_implicit_failures_accumulate_in_declared_order() {
    let mut v = make(json!({ "code": "zz" }), &[("code", "digits:4|min:3|starts_with:a")]);
    assert!(v.fails());
    assert_eq!(
        v.errors().get("code"),
        [
            "The code must be 4 digits.",
            "The code must be at least 3.",
            "The code must start with one of the following: a.",
        ]
    );
}

#[test]
fn bail_stops_one_field_but_not_the_others() {
    let mut v = make(
        json!({ "code": "zz", "name": "" }),
        &[("code", "bail|digits:4|min:3"), ("name", "required")],
    );
    assert!(v.fails());
    assert_eq!(v.errors().get("code"), ["The code must be 4 digits."]);
    assert!(v.errors().has("name"));
}

#[test]
fn stop_on_first_failure_leaves_one_message_total() {
    let mut v = make(
        json!({ "a": "zz", "b": "zz" }),
        &[("a", "digits:4|min:3"), ("b", "digits:4")],
    );
    v.stop_on_first_failure();
    assert!(v.fails());
    assert_eq!(v.errors().count(), 1);
}

#[test]
fn sometimes_skips_an_absent_field_even_with_required() {
    let mut v = make(json!({}), &[("nickname", "sometimes|required|min:3")]);
    assert!(v.passes());

    let mut v = make(
        json!({ "nickname": "x" }),
        &[("nickname", "sometimes|required|min:3")],
    );
    assert!(v.fails());
}

#[test]
fn sometimes_judges_each_expanded_wildcard_target() {
    // A present element still gets validated under `sometimes`.
    let mut v = make(
        json!({ "users": [{ "email": "not-an-email" }] }),
        &[("users.*.email", "sometimes|email")],
    );
    assert!(v.fails());
    assert!(v.errors().has("users.0.email"));

    // Elements without the field are skipped; the one carrying it is not.
    let mut v = make(
        json!({ "users": [{ "name": "ada" }, { "email": "bad" }] }),
        &[("users.*.email", "sometimes|required|email")],
    );
    assert!(v.fails());
    assert!(!v.errors().has("users.0.email"));
    assert!(v.errors().has("users.1.email"));
}

#[test]
fn nullable_accepts_explicit_null_but_not_absence() {
    let mut v = make(json!({ "age": null }), &[("age", "nullable|required|integer")]);
    assert!(v.passes());

    let mut v = make(json!({ "age": null }), &[("age", "required|integer")]);
    assert!(v.fails());

    let mut v = make(json!({}), &[("age", "nullable|required|integer")]);
    assert!(v.fails());
}

#[test]
fn wildcard_failures_report_under_indexed_names() {
    let mut v = make(
        json!({ "users": [
            { "email": "good@example.com" },
            { "email": "broken" },
        ] }),
        &[("users.*.email", "required|email")],
    );
    assert!(v.fails());
    assert!(!v.errors().has("users.0.email"));
    assert_eq!(
        v.errors().get("users.1.email"),
        ["The users.1.email must be a valid email address."]
    );
}

#[test]
fn wildcard_over_missing_array_is_vacuous() {
    let mut v = make(json!({}), &[("users.*.email", "required|email")]);
    assert!(v.passes());
}

#[test]
fn nested_paths_resolve_for_rules_and_operands() {
    let mut v = make(
        json!({ "user": { "profile": { "age": 15 } }, "floor": 18 }),
        &[("user.profile.age", "integer|gte:floor")],
    );
    assert!(v.fails());
    assert!(v.errors().has("user.profile.age"));
}

#[test]
fn message_overrides_most_specific_wins() {
    let mut v = make(json!({}), &[("email", "required")]);
    assert_eq!(v.errors().first("email"), None);

    assert!(v.fails());
    assert_eq!(v.errors().first("email"), Some("The email field is required."));

    v.set_message("required", ":attribute is mandatory");
    assert!(v.fails());
    assert_eq!(v.errors().first("email"), Some("email is mandatory"));

    v.set_message("email.required", "we need your :attribute");
    assert!(v.fails());
    assert_eq!(v.errors().first("email"), Some("we need your email"));
}

#[test]
fn attribute_overrides_rename_the_placeholder() {
    let mut v = make(json!({}), &[("dob", "required")]);
    v.set_attribute("dob", "date of birth");
    assert!(v.fails());
    assert_eq!(
        v.errors().first("dob"),
        Some("The date of birth field is required.")
    );
}

#[test]
fn wildcard_messages_fall_back_to_the_declared_name() {
    let mut v = make(
        json!({ "tags": [1] }),
        &[("tags.*", "string")],
    );
    v.set_message("tags.*.string", "tags must be words");
    assert!(v.fails());
    assert_eq!(v.errors().first("tags.0"), Some("tags must be words"));
}

#[test]
fn validate_surfaces_the_bag_as_an_error() {
    let mut v = make(json!({}), &[("name", "required")]);
    let failure = v.validate().expect_err("must fail");
    assert_eq!(failure.errors().count(), 1);
    assert!(failure.to_string().contains("The name field is required."));

    let mut v = make(json!({ "name": "ada" }), &[("name", "required")]);
    assert!(v.validate().is_ok());
}

#[test]
fn valid_and_invalid_partition_the_record() {
    let mut v = make(
        json!({ "name": "ada", "age": "old" }),
        &[("name", "required"), ("age", "integer")],
    );
    let valid = v.valid();
    assert!(valid.contains_key("name"));
    assert!(!valid.contains_key("age"));
    let invalid = v.invalid();
    assert_eq!(invalid.len(), 1);
    assert!(invalid.contains_key("age"));
}

#[test]
fn conditional_rules_via_sometimes_callback() {
    let registry = Registry::new();
    let raw = parse_field_spec("digits:9");
    let is_business = |record: &Record| {
        record.get("kind").and_then(serde_json::Value::as_str) == Some("business")
    };

    let mut v = registry
        .make(json!({ "kind": "business", "vat": "12" }), [("kind", "required")])
        .expect("ruleset compiles");
    let rule = registry.build_rule("vat", &raw[0]).expect("rule builds");
    v.sometimes("vat", vec![rule], is_business);
    assert!(v.fails());
    assert_eq!(v.errors().get("vat"), ["The vat must be 9 digits."]);

    let mut v = registry
        .make(json!({ "kind": "personal", "vat": "12" }), [("kind", "required")])
        .expect("ruleset compiles");
    let rule = registry.build_rule("vat", &raw[0]).expect("rule builds");
    v.sometimes("vat", vec![rule], is_business);
    assert!(v.passes());
}

#[test]
fn cross_field_comparisons_against_sibling_chains() {
    // max_guests declares numeric, so its string value sizes by magnitude
    // when guests compares against it.
    let mut v = make(
        json!({ "max_guests": "10", "guests": 12 }),
        &[("max_guests", "numeric"), ("guests", "integer|lte:max_guests")],
    );
    assert!(v.fails());
    assert_eq!(
        v.errors().get("guests"),
        ["The guests must be less than or equal to max_guests."]
    );
}

#[test]
fn sessions_from_one_registry_run_on_separate_threads() {
    let registry = std::sync::Arc::new(Registry::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = std::sync::Arc::clone(&registry);
            std::thread::spawn(move || {
                let mut v = registry
                    .make(json!({ "n": i.to_string() }), [("n", "required|integer|max:2")])
                    .expect("ruleset compiles");
                v.passes()
            })
        })
        .collect();
    let outcomes: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outcomes, [true, true, true, false]);
}
