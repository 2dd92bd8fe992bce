//! # Encoding — Decoded Values Back to JSON
//!
//! The inverse of evaluation: turns an output [`Value`] tree back into a
//! `serde_json::Value` (or JSON text) using each format's encode half.
//!
//! Default conversions come from the built-in formats (timestamp → RFC 3339,
//! duration → ISO 8601, identifier → canonical string, byte buffer →
//! base64). [`Value::Opaque`] leaves are encoded by the registry entry named
//! by their format symbol; a symbol missing from the registry is an error.

use crate::builtin::{
    BinaryFormat, DateFormat, DateTimeFormat, DurationFormat, Ipv4Format, Ipv6Format, TimeFormat,
    UuidFormat,
};
use crate::error::FormatError;
use crate::format::{Format, FormatRegistry};
use crate::value::Value;

/// Convert an output tree into a `serde_json::Value`.
///
/// # Errors
///
/// Returns `FormatError` if an opaque leaf names a format missing from
/// `registry`, or if a format's encoder rejects its value.
pub fn to_json(value: &Value, registry: &FormatRegistry) -> Result<serde_json::Value, FormatError> {
    let encoded = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Value::Number(n.clone()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| to_json(item, registry))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, item) in map {
                out.insert(key.clone(), to_json(item, registry)?);
            }
            serde_json::Value::Object(out)
        }
        Value::Uuid(_) => serde_json::Value::String(UuidFormat.encode(value)?),
        Value::DateTime(_) | Value::LocalDateTime(_) => {
            serde_json::Value::String(DateTimeFormat.encode(value)?)
        }
        Value::Date(_) => serde_json::Value::String(DateFormat.encode(value)?),
        Value::Time(_) => serde_json::Value::String(TimeFormat.encode(value)?),
        Value::Duration(_) => serde_json::Value::String(DurationFormat.encode(value)?),
        Value::Ipv4(_) => serde_json::Value::String(Ipv4Format.encode(value)?),
        Value::Ipv6(_) => serde_json::Value::String(Ipv6Format.encode(value)?),
        Value::Bytes(_) => serde_json::Value::String(BinaryFormat.encode(value)?),
        Value::Opaque(opaque) => {
            let format = registry.get(opaque.format()).ok_or_else(|| {
                FormatError::new(opaque.format(), "no registered format can encode this value")
            })?;
            serde_json::Value::String(format.encode(value)?)
        }
    };
    Ok(encoded)
}

/// Convert an output tree into compact JSON text.
pub fn to_string(value: &Value, registry: &FormatRegistry) -> Result<String, FormatError> {
    let json = to_json(value, registry)?;
    serde_json::to_string(&json).map_err(|e| FormatError::new("json", e.to_string()))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for arbitrary JSON trees.
    fn json_value() -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            (-1.0e6f64..1.0e6).prop_map(|f| serde_json::json!(f)),
            "[a-zA-Z0-9_ @.-]{0,24}".prop_map(serde_json::Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(serde_json::Value::Array),
                prop::collection::btree_map("[a-z]{1,8}", inner, 0..8)
                    .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        /// Plain JSON survives conversion into a value tree and back.
        #[test]
        fn json_round_trips_through_value(original in json_value()) {
            let value = Value::from(&original);
            let encoded = to_json(&value, &FormatRegistry::builtin()).unwrap();
            prop_assert_eq!(encoded, original);
        }

        /// Structural equality is reflexive on converted trees.
        #[test]
        fn value_equality_is_reflexive(original in json_value()) {
            let value = Value::from(&original);
            prop_assert_eq!(value.clone(), value);
        }
    }
}
