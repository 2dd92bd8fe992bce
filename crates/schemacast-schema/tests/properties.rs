//! Whole-pipeline properties: pass-through, idempotence, shape preservation
//! and YAML/JSON equivalence.

mod common;

use common::init_tracing;
use proptest::prelude::*;
use schemacast_core::Value;
use schemacast_schema::Validator;
use serde_json::json;

fn json_value() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        "[a-zA-Z0-9 _.-]{0,16}".prop_map(serde_json::Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

fn record_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "string", "format": "uuid"},
            "seen": {"type": "array", "items": {"type": "string", "format": "date-time"}},
            "ttl": {"type": "string", "format": "duration"},
            "peer": {
                "type": "object",
                "properties": {"addr": {"type": "string", "format": "ipv4"}}
            },
            "blob": {"type": "string", "format": "binary"}
        },
        "required": ["id"]
    })
}

const RECORD: &str = r#"{
    "id": "3e4666bf-d5e5-4aa7-b8ce-cefe41c7568a",
    "seen": ["2018-11-13T20:20:39+00:00", "2020-01-01T00:00:00Z"],
    "ttl": "P1DT12H",
    "peer": {"addr": "192.168.0.1", "port": 8080},
    "blob": "AAEC",
    "note": "kept as is"
}"#;

#[test]
fn test_reevaluating_output_is_identity() {
    init_tracing();
    let validator = Validator::new(&record_schema()).unwrap();
    let first = validator.loads(RECORD).unwrap();
    let second = validator.evaluate(&first).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_output_encodes_back_to_equivalent_json() {
    let validator = Validator::new(&record_schema()).unwrap();
    let out = validator.loads(RECORD).unwrap();
    let encoded: serde_json::Value = serde_json::from_str(&validator.dumps(&out).unwrap()).unwrap();
    assert_eq!(encoded["id"], json!("3e4666bf-d5e5-4aa7-b8ce-cefe41c7568a"));
    assert_eq!(encoded["ttl"], json!("P1DT12H"));
    assert_eq!(encoded["peer"], json!({"addr": "192.168.0.1", "port": 8080}));
    assert_eq!(encoded["blob"], json!("AAEC"));
    assert_eq!(encoded["note"], json!("kept as is"));
    // Re-validating the encoded form yields the same decoded tree.
    assert_eq!(validator.validate(&encoded).unwrap(), out);
}

#[test]
fn test_dumps_keeps_document_key_order() {
    let validator = Validator::new(&record_schema()).unwrap();
    let out = validator.loads(RECORD).unwrap();
    let encoded: serde_json::Value = serde_json::from_str(&validator.dumps(&out).unwrap()).unwrap();
    let keys: Vec<&str> = encoded.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["id", "seen", "ttl", "peer", "blob", "note"]);
    let peer: Vec<&str> = encoded["peer"].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(peer, ["addr", "port"]);
}

#[test]
fn test_yaml_and_json_inputs_agree() {
    let validator = Validator::new(&record_schema()).unwrap();
    let yaml = "\
id: 3e4666bf-d5e5-4aa7-b8ce-cefe41c7568a
seen:
  - '2018-11-13T20:20:39+00:00'
  - '2020-01-01T00:00:00Z'
ttl: P1DT12H
peer:
  addr: 192.168.0.1
  port: 8080
blob: AAEC
note: kept as is
";
    assert_eq!(
        validator.loads_yaml(yaml).unwrap(),
        validator.loads(RECORD).unwrap()
    );
}

proptest! {
    /// The empty schema accepts every instance and returns it unchanged.
    #[test]
    fn empty_schema_is_identity(instance in json_value()) {
        let validator = Validator::new(&json!({})).unwrap();
        let out = validator.validate(&instance).unwrap();
        prop_assert_eq!(out, instance);
    }

    /// Without formats, a permissive typed schema preserves the tree.
    #[test]
    fn object_schema_without_formats_preserves_shape(
        instance in prop::collection::btree_map("[a-z]{1,6}", json_value(), 0..6)
    ) {
        let instance = serde_json::Value::Object(instance.into_iter().collect());
        let validator = Validator::new(&json!({
            "type": "object",
            "patternProperties": {"^a": true},
            "additionalProperties": {}
        }))
        .unwrap();
        prop_assert_eq!(validator.validate(&instance).unwrap(), instance);
    }

    /// Evaluation is deterministic.
    #[test]
    fn evaluation_is_deterministic(instance in json_value()) {
        let validator = Validator::new(&json!({"type": ["object", "array", "string", "number", "boolean", "null"]}))
            .unwrap();
        let a = validator.validate(&instance).map_err(|e| e.to_string());
        let b = validator.validate(&instance).map_err(|e| e.to_string());
        prop_assert_eq!(a, b);
    }

    /// Decoded leaves stay decoded on a second pass.
    #[test]
    fn uuid_leaves_are_stable(bytes in any::<[u8; 16]>()) {
        let id = uuid::Uuid::from_bytes(bytes);
        let validator = Validator::new(&json!({"type": "string", "format": "uuid"})).unwrap();
        let out = validator.validate(&json!(id.to_string())).unwrap();
        prop_assert_eq!(&out, &Value::Uuid(id));
        prop_assert_eq!(validator.evaluate(&out).unwrap(), out);
    }
}
