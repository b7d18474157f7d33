//! Engine behaviour over the documented scenarios: plain, nested, array,
//! aggregate and conditional rules.

use model_validator::{
    count_errors_like, validate, ArrayLength, Outcome, Params, Rule, StringContains,
    StringLength, StringPattern, StringRequired, ValidationModel, ValidationState,
    ValidatorBinding, ViolationLevel,
};
use serde_json::{json, Value};

fn required(message: &str) -> ValidatorBinding {
    ValidatorBinding::new(StringRequired).message(message)
}

fn min_length(min: usize, message: &str) -> ValidatorBinding {
    ValidatorBinding::new(StringLength)
        .params(json!({"min": min, "skipIfEmpty": true}))
        .message(message)
}

fn user_model() -> ValidationModel {
    ValidationModel::new()
        .rule(
            "user.personalData.name",
            Rule::new()
                .validator(required("Name is required"))
                .validator(min_length(4, "At least 4 characters, please"))
                .validator(
                    ValidatorBinding::new(StringContains)
                        .params(json!({"searchString": "a", "skipIfEmpty": true}))
                        .message("Only names containing \"a\" are allowed"),
                ),
        )
        .rule(
            "user.personalData.surname",
            Rule::new()
                .validator(
                    required("Surname is recommended to fill").level(ViolationLevel::Notice),
                )
                .validator(
                    min_length(3, "At least 3 characters, please").level(ViolationLevel::Warning),
                ),
        )
        .rule(
            "personalDataSection",
            Rule::new()
                .message("Invalid personal data")
                .level(ViolationLevel::Error)
                .postvalidator(|_, result| count_errors_like("user.personalData", result) == 0),
        )
}

fn user(name: &str, surname: &str) -> Value {
    json!({"user": {"personalData": {"name": name, "surname": surname}}})
}

// ---------------------------------------------------------------------------
// Plain fields
// ---------------------------------------------------------------------------

#[test]
fn valid_data_has_level_none() {
    let result = validate(&user("Jane", "Doe"), &user_model());
    assert_eq!(result.state, ValidationState::Completed);
    assert_eq!(result.level, ViolationLevel::None);
    assert!(result.errors.is_empty() && result.warnings.is_empty() && result.notices.is_empty());
    assert_eq!(result.stats.processed_rules, 3);
    assert_eq!(result.stats.processed_validators, 5);
    assert!(result.stats.finished_at.is_some());
}

#[test]
fn short_non_empty_name_runs_length_check() {
    let model = ValidationModel::new().rule(
        "name",
        Rule::new().validator(min_length(4, "too short")),
    );
    let result = validate(&json!({"name": "Jo"}), &model);
    assert_eq!(result.errors["name"], vec!["too short"]);
}

#[test]
fn empty_name_reports_once_and_skips_dependents() {
    let result = validate(&user("", "Doe"), &user_model());
    assert_eq!(result.errors["user.personalData.name"], vec!["Name is required"]);
    // length and contains both declined to judge the empty value
    assert_eq!(result.stats.total_skipped, 2);
    assert!(result.skipped.is_empty());
}

#[test]
fn messages_keep_validator_order() {
    let result = validate(&user("Jo", "Doe"), &user_model());
    assert_eq!(
        result.errors["user.personalData.name"],
        vec!["At least 4 characters, please", "Only names containing \"a\" are allowed"]
    );
    assert_eq!(result.stats.total_errors, 3);
}

#[test]
fn per_binding_levels_route_messages() {
    let result = validate(&user("Jane", ""), &user_model());
    assert_eq!(result.notices["user.personalData.surname"], vec!["Surname is recommended to fill"]);
    assert!(result.warnings.is_empty());
    assert_eq!(result.level, ViolationLevel::Notice);

    let result = validate(&user("Jane", "Do"), &user_model());
    assert_eq!(result.warnings["user.personalData.surname"], vec!["At least 3 characters, please"]);
    assert_eq!(result.level, ViolationLevel::Warning);
    assert!(result.errors.get("personalDataSection").is_none());
}

#[test]
fn optional_pattern_skips_empty_values() {
    let zip = |skip: bool| {
        ValidatorBinding::new(StringPattern)
            .params(json!({"pattern": r"\d{5}", "skipIfEmpty": skip}))
            .message("Zip must be five digits")
    };
    let model = ValidationModel::new()
        .rule("zip", Rule::new().validator(zip(true)))
        .rule("backupZip", Rule::new().validator(zip(true)));

    let result = validate(&json!({"zip": "", "backupZip": null}), &model);
    assert_eq!(result.stats.total_skipped, 2);
    assert_eq!(result.stats.processed_validators, 2);
    assert!(result.skipped.is_empty());
    assert_eq!(result.level, ViolationLevel::None);

    let result = validate(&json!({"zip": "1234", "backupZip": "12345"}), &model);
    assert_eq!(result.errors["zip"], vec!["Zip must be five digits"]);
    assert_eq!(result.stats.total_skipped, 0);

    let model = ValidationModel::new().rule("zip", Rule::new().validator(zip(false)));
    let result = validate(&json!({"zip": ""}), &model);
    assert_eq!(result.errors["zip"], vec!["Zip must be five digits"]);
    assert_eq!(result.stats.total_skipped, 0);
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

#[test]
fn aggregate_sees_earlier_rules() {
    let result = validate(&user("", "Doe"), &user_model());
    assert_eq!(result.errors["personalDataSection"], vec!["Invalid personal data"]);
    let keys: Vec<&String> = result.errors.keys().collect();
    assert_eq!(keys, vec!["user.personalData.name", "personalDataSection"]);
}

#[test]
fn aggregate_declared_first_sees_nothing() {
    let model = ValidationModel::new()
        .rule(
            "section",
            Rule::new().postvalidator(|_, result| count_errors_like("name", result) == 0),
        )
        .rule("name", Rule::new().validator(required("required")));
    let result = validate(&json!({"name": ""}), &model);
    assert!(result.errors.get("section").is_none());
    assert_eq!(result.stats.total_errors, 1);
}

#[test]
fn aggregate_without_message_uses_fallback() {
    let model = ValidationModel::new().rule(
        "contacts_aggregate",
        Rule::new().postvalidator(|data, _| {
            data["contacts"]
                .as_array()
                .is_some_and(|items| items.iter().any(|c| c["default"] == json!(true)))
        }),
    );
    let result = validate(&json!({"contacts": [{"default": false}]}), &model);
    assert_eq!(
        result.errors["contacts_aggregate"],
        vec!["Empty message, contacts_aggregate"]
    );
}

#[test]
fn aggregate_sees_pending_result() {
    let model = ValidationModel::new().rule(
        "pendingCheck",
        Rule::new().postvalidator(|_, result| {
            result.state == ValidationState::Pending && result.level == ViolationLevel::Unknown
        }),
    );
    assert_eq!(validate(&json!({}), &model).level, ViolationLevel::None);
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

fn titles_model() -> ValidationModel {
    ValidationModel::new()
        .rule(
            "titles[]",
            Rule::new().validator(
                ValidatorBinding::new(ArrayLength)
                    .params(json!({"min": 3}))
                    .message("At least 3 titles must exist"),
            ),
        )
        .rule("titles[*]", Rule::new().validator(required("Title is required")))
}

#[test]
fn wildcard_expands_per_element() {
    let result = validate(&json!({"titles": ["", "", ""]}), &titles_model());
    let keys: Vec<&String> = result.errors.keys().collect();
    assert_eq!(keys, vec!["titles[0]", "titles[1]", "titles[2]"]);
    assert!(result.errors.values().all(|m| m.len() == 1));
    assert_eq!(result.stats.total_errors, 3);
}

#[test]
fn whole_array_rule_keys_on_brackets() {
    let result = validate(&json!({"titles": ["Mr.", ""]}), &titles_model());
    assert_eq!(result.errors["titles[]"], vec!["At least 3 titles must exist"]);
    assert_eq!(result.errors["titles[1]"], vec!["Title is required"]);
    assert!(result.errors.get("titles[0]").is_none());
}

#[test]
fn empty_array_and_nested_wildcards() {
    let model = ValidationModel::new()
        .rule(
            "addresses[]",
            Rule::new().validator(
                ValidatorBinding::new(ArrayLength)
                    .params(json!({"min": 1}))
                    .message("At least 1 address must exist"),
            ),
        )
        .rule("addresses[*].zip", Rule::new().validator(required("Zip code is required")))
        .rule("addresses[*].city", Rule::new().validator(required("City name is required")));

    let result = validate(&json!({"addresses": []}), &model);
    assert_eq!(result.errors["addresses[]"], vec!["At least 1 address must exist"]);
    assert_eq!(result.errors.len(), 1);
    assert!(result.skipped.is_empty());
    assert_eq!(result.stats.total_skipped, 0);

    let data = json!({"addresses": [{"zip": "", "city": "Paris"}, {"zip": "75001", "city": ""}]});
    let result = validate(&data, &model);
    assert_eq!(result.errors["addresses[0].zip"], vec!["Zip code is required"]);
    assert_eq!(result.errors["addresses[1].city"], vec!["City name is required"]);
    assert_eq!(result.stats.total_errors, 2);
}

#[test]
fn out_of_bounds_index_is_skipped() {
    let model = ValidationModel::new().rule("a[5]", Rule::new().validator(required("x")));
    let result = validate(&json!({"a": ["", ""]}), &model);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].address, "a[5]");
    assert_eq!(result.skipped[0].segment, "[5]");
    assert_eq!(result.stats.total_skipped, 1);
    assert_eq!(result.stats.total_errors, 0);
    assert_eq!(result.level, ViolationLevel::None);
}

#[test]
fn missing_path_is_skipped_with_segment() {
    let model =
        ValidationModel::new().rule("form.users.data", Rule::new().validator(required("x")));
    let result = validate(&json!({"form": {"user": {"data": ""}}}), &model);
    assert_eq!(result.skipped[0].address, "form.users.data");
    assert_eq!(result.skipped[0].segment, "users");
}

#[test]
fn malformed_address_is_skipped() {
    let model = ValidationModel::new().rule("a..b", Rule::new().validator(required("x")));
    let result = validate(&json!({}), &model);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].address, "a..b");
    assert_eq!(result.skipped[0].segment, "empty segment at position 2");
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

#[test]
fn inactive_rule_contributes_nothing() {
    let model = ValidationModel::new()
        .rule("name", Rule::new().active(false).validator(required("x")))
        .rule("missing.path", Rule::new().active(false).validator(required("y")))
        .rule("agg", Rule::new().active(false).postvalidator(|_, _| false));
    let result = validate(&json!({"name": ""}), &model);
    assert_eq!(result.level, ViolationLevel::None);
    assert!(result.skipped.is_empty());
    assert_eq!(result.stats.processed_rules, 0);
    assert_eq!(result.stats.processed_validators, 0);
    assert_eq!(result.stats.total_skipped, 0);
}

#[test]
fn conditional_activation_per_element() {
    let model = ValidationModel::new().rule(
        "contacts[*].value",
        Rule::new()
            .active_when(|_, value| value.as_str().is_some_and(|v| !v.starts_with('+')))
            .validator(ValidatorBinding::new(model_validator::Email).message("bad email")),
    );
    let data = json!({"contacts": [
        {"value": "+5500123456678"},
        {"value": "not-an-email"},
        {"value": "johndoe@mail.com"}
    ]});
    let result = validate(&data, &model);
    let keys: Vec<&String> = result.errors.keys().collect();
    assert_eq!(keys, vec!["contacts[1].value"]);
    assert_eq!(result.stats.processed_validators, 2);
}

#[test]
fn activation_can_read_whole_data() {
    let model = ValidationModel::new().rule(
        "company",
        Rule::new()
            .active_when(|data, _| data["isBusiness"] == json!(true))
            .validator(required("Company is required")),
    );
    assert!(validate(&json!({"isBusiness": false, "company": ""}), &model).errors.is_empty());
    assert_eq!(
        validate(&json!({"isBusiness": true, "company": ""}), &model).errors["company"],
        vec!["Company is required"]
    );
}

// ---------------------------------------------------------------------------
// Custom validators and messages
// ---------------------------------------------------------------------------

#[test]
fn custom_validator_sees_whole_data() {
    let matches_password = |value: &Value, _: &Params, data: &Value| {
        Outcome::from(Some(value == &data["password"]))
    };
    let model = ValidationModel::new().rule(
        "confirm",
        Rule::new().validator(ValidatorBinding::new(matches_password).message("Passwords differ")),
    );
    let ok = validate(&json!({"password": "s3cret", "confirm": "s3cret"}), &model);
    assert_eq!(ok.level, ViolationLevel::None);
    let bad = validate(&json!({"password": "s3cret", "confirm": "secret"}), &model);
    assert_eq!(bad.errors["confirm"], vec!["Passwords differ"]);
}

#[test]
fn dynamic_message_receives_value() {
    let model = ValidationModel::new().rule(
        "name",
        Rule::new().validator(
            ValidatorBinding::new(StringLength)
                .params(json!({"min": 4}))
                .message(model_validator::Message::dynamic(|_, value| {
                    format!("{} is too short", value.as_str().unwrap_or_default())
                })),
        ),
    );
    let result = validate(&json!({"name": "Jo"}), &model);
    assert_eq!(result.errors["name"], vec!["Jo is too short"]);
}

#[test]
fn repeated_runs_produce_fresh_results() {
    let model = user_model();
    let first = validate(&user("", "Doe"), &model);
    let second = validate(&user("Jane", "Doe"), &model);
    assert_eq!(first.level, ViolationLevel::Error);
    assert_eq!(second.level, ViolationLevel::None);
    assert!(second.errors.is_empty());
}
