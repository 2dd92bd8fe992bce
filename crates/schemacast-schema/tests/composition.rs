//! allOf / anyOf / oneOf / not, alone and merged with sibling keywords.

mod common;

use common::{loads, violation};
use schemacast_core::{Value, ViolationKind};
use serde_json::json;

#[test]
fn test_all_of() {
    let schema = json!({
        "allOf": [
            {"type": "string", "minLength": 2},
            {"type": "string", "maxLength": 5}
        ]
    });
    assert_eq!(loads(r#""good""#, &schema).unwrap(), json!("good"));
    assert_eq!(violation(r#""too long""#, &schema), ViolationKind::AllOfFailed);
    assert_eq!(violation(r#""1""#, &schema), ViolationKind::AllOfFailed);
}

#[test]
fn test_all_of_names_failing_variant() {
    let schema = json!({
        "allOf": [
            {"type": "string", "minLength": 2},
            {"type": "string", "maxLength": 5}
        ]
    });
    let err = loads(r#""too long""#, &schema).unwrap_err();
    let v = err.as_violation().unwrap();
    assert_eq!(v.message(), "allOf[1] failed");
    assert_eq!(v.root_violation().kind(), ViolationKind::LengthViolation);
}

#[test]
fn test_any_of() {
    let schema = json!({
        "anyOf": [
            {"type": "string", "maxLength": 5},
            {"type": "number", "minimum": 0}
        ]
    });
    assert_eq!(loads(r#""short""#, &schema).unwrap(), json!("short"));
    assert_eq!(loads("12", &schema).unwrap(), json!(12));
    assert_eq!(violation("-5", &schema), ViolationKind::AnyOfExhausted);
    assert_eq!(violation(r#""too long""#, &schema), ViolationKind::AnyOfExhausted);
}

#[test]
fn test_one_of() {
    let schema = json!({
        "oneOf": [
            {"type": "number", "multipleOf": 5},
            {"type": "number", "multipleOf": 3}
        ]
    });
    assert_eq!(loads("10", &schema).unwrap(), json!(10));
    assert_eq!(loads("9", &schema).unwrap(), json!(9));
    assert_eq!(violation("2", &schema), ViolationKind::OneOfAmbiguous);
    assert_eq!(violation("15", &schema), ViolationKind::OneOfAmbiguous);
}

#[test]
fn test_not() {
    let schema = json!({"not": {"type": "string"}});
    assert_eq!(loads("10", &schema).unwrap(), json!(10));
    assert_eq!(loads(r#"{ "key": "value" }"#, &schema).unwrap(), json!({"key": "value"}));
    assert_eq!(violation(r#""I am a string""#, &schema), ViolationKind::NotViolated);
}

#[test]
fn test_base_keywords_merge_into_variants() {
    let schema = json!({
        "type": "number",
        "oneOf": [{"multipleOf": 5}, {"multipleOf": 3}]
    });
    assert!(loads("10", &schema).is_ok());
    assert!(loads("6", &schema).is_ok());
    assert_eq!(violation(r#""I am a string""#, &schema), ViolationKind::OneOfAmbiguous);
    assert_eq!(violation("4", &schema), ViolationKind::OneOfAmbiguous);
}

#[test]
fn test_variant_keys_override_base() {
    let schema = json!({
        "type": "string",
        "anyOf": [{"type": "number"}]
    });
    assert_eq!(loads("3", &schema).unwrap(), json!(3));
    assert_eq!(violation(r#""x""#, &schema), ViolationKind::AnyOfExhausted);
}

#[test]
fn test_conditionals_inside_all_of() {
    let schema = json!({
        "type": "object",
        "properties": {
            "street_address": {"type": "string"},
            "country": {
                "default": "United States of America",
                "enum": ["United States of America", "Canada", "Netherlands"]
            }
        },
        "allOf": [
            {
                "if": {
                    "type": "object",
                    "properties": {"country": {"const": "United States of America"}}
                },
                "then": {
                    "type": "object",
                    "properties": {"postal_code": {"type": "string", "pattern": "[0-9]{5}(-[0-9]{4})?"}}
                }
            },
            {
                "if": {
                    "type": "object",
                    "properties": {"country": {"const": "Canada"}},
                    "required": ["country"]
                },
                "then": {
                    "type": "object",
                    "properties": {"postal_code": {"type": "string", "pattern": "[A-Z][0-9][A-Z] [0-9][A-Z][0-9]"}}
                }
            },
            {
                "if": {
                    "type": "object",
                    "properties": {"country": {"const": "Netherlands"}},
                    "required": ["country"]
                },
                "then": {
                    "type": "object",
                    "properties": {"postal_code": {"type": "string", "pattern": "[0-9]{4} [A-Z]{2}"}}
                }
            }
        ]
    });

    for accepted in [
        r#"{"street_address": "1600 Pennsylvania Avenue NW", "country": "United States of America", "postal_code": "20500"}"#,
        r#"{"street_address": "1600 Pennsylvania Avenue NW", "postal_code": "20500"}"#,
        r#"{"street_address": "24 Sussex Drive", "country": "Canada", "postal_code": "K1M 1M4"}"#,
        r#"{"street_address": "Adriaan Goekooplaan", "country": "Netherlands", "postal_code": "2517 JX"}"#,
    ] {
        assert!(loads(accepted, &schema).is_ok(), "{accepted}");
    }
    for rejected in [
        r#"{"street_address": "24 Sussex Drive", "country": "Canada", "postal_code": "10000"}"#,
        r#"{"street_address": "1600 Pennsylvania Avenue NW", "postal_code": "K1M 1M4"}"#,
    ] {
        assert_eq!(violation(rejected, &schema), ViolationKind::AllOfFailed, "{rejected}");
    }
}

#[test]
fn test_all_of_output_comes_from_first_variant() {
    let schema = json!({
        "type": "string",
        "allOf": [{"minLength": 1}, {"format": "date"}]
    });
    assert_eq!(loads(r#""2021-03-04""#, &schema).unwrap(), json!("2021-03-04"));
}

#[test]
fn test_any_of_output_comes_from_last_success() {
    let schema = json!({
        "type": "string",
        "anyOf": [{"minLength": 1}, {"format": "date"}]
    });
    let out = loads(r#""2021-03-04""#, &schema).unwrap();
    assert!(matches!(out, Value::Date(_)));
}
