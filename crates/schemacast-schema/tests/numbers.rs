//! Number schemas: type checks, ranges and `multipleOf`.

mod common;

use common::{loads, violation};
use schemacast_core::ViolationKind;
use serde_json::json;

#[test]
fn test_number_type() {
    let schema = json!({"type": "number"});
    assert_eq!(loads("3", &schema).unwrap(), json!(3));
    assert_eq!(loads("3.1", &schema).unwrap(), json!(3.1));

    for raw in [r#""asdf""#, "{}", "[1,2]", "true"] {
        assert_eq!(violation(raw, &schema), ViolationKind::TypeMismatch, "{raw}");
    }
    assert!(loads(".3", &schema).is_err());
}

#[test]
fn test_multiple_of() {
    let schema = json!({"type": "number", "multipleOf": 3});
    assert_eq!(loads("6", &schema).unwrap(), json!(6));
    assert_eq!(violation("4", &schema), ViolationKind::MultipleOfViolation);
    assert_eq!(violation("3.5", &schema), ViolationKind::MultipleOfViolation);

    let schema = json!({"type": "number", "multipleOf": 3.5});
    assert_eq!(loads("7", &schema).unwrap(), json!(7));
}

#[test]
fn test_ranges() {
    let cases = [
        (json!({"type": "number", "minimum": 3}), ["3", "4"], "2"),
        (json!({"type": "number", "exclusiveMinimum": 3}), ["4", "3.01"], "3"),
        (json!({"type": "number", "maximum": 3}), ["3", "2"], "4"),
        (json!({"type": "number", "exclusiveMaximum": 3}), ["2", "2.99"], "3"),
    ];
    for (schema, accepted, rejected) in cases {
        for raw in accepted {
            assert!(loads(raw, &schema).is_ok(), "{raw} against {schema}");
        }
        assert_eq!(violation(rejected, &schema), ViolationKind::RangeViolation);
    }
}

#[test]
fn test_integer_shares_number_rules() {
    let schema = json!({"type": "integer", "minimum": 0});
    assert!(loads("12", &schema).is_ok());
    assert_eq!(violation("-1", &schema), ViolationKind::RangeViolation);
}
