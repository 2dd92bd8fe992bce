//! String schemas: type checks, lengths and patterns.

mod common;

use common::{loads, violation};
use schemacast_core::ViolationKind;
use serde_json::json;

#[test]
fn test_string_type() {
    let schema = json!({"type": "string"});
    assert_eq!(loads(r#""string""#, &schema).unwrap(), json!("string"));
    assert_eq!(loads(r#""21""#, &schema).unwrap(), json!("21"));
    for raw in ["{}", "[1,2]", "3", "null"] {
        assert_eq!(violation(raw, &schema), ViolationKind::TypeMismatch, "{raw}");
    }
}

#[test]
fn test_pattern() {
    let schema = json!({"type": "string", "pattern": "[a-z]*"});
    assert_eq!(loads(r#""test""#, &schema).unwrap(), json!("test"));
    assert_eq!(violation(r#""test1""#, &schema), ViolationKind::PatternMismatch);
}

#[test]
fn test_length() {
    let schema = json!({"type": "string", "minLength": 3, "maxLength": 5});
    assert_eq!(loads(r#""test""#, &schema).unwrap(), json!("test"));
    assert_eq!(violation(r#""t2""#, &schema), ViolationKind::LengthViolation);
    assert_eq!(violation(r#""t2sdfas""#, &schema), ViolationKind::LengthViolation);
}

#[test]
fn test_length_of_escaped_unicode() {
    let schema = json!({"type": "string", "maxLength": 2});
    assert!(loads(r#""éè""#, &schema).is_ok());
    assert!(loads(r#""😀😀""#, &schema).is_ok());
}
