//! YAML input support: YAML trees are converted to JSON trees before
//! evaluation, so a YAML document and its JSON rendering validate alike.
//!
//! Scalar mapping keys (strings, numbers, booleans, null) become their JSON
//! text; sequence or mapping keys have no JSON equivalent and are rejected.
//! Tags are dropped and the tagged value converted.

use serde_json::{Map as JsonMap, Number, Value as Json};
use serde_yaml::Value as Yaml;

use crate::error::YamlConversionError;

/// Convert a parsed YAML document to the equivalent JSON tree.
pub fn yaml_to_json(yaml: &Yaml) -> Result<Json, YamlConversionError> {
    Ok(match yaml {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(*b),
        Yaml::Number(n) => Json::Number(number(n)?),
        Yaml::String(s) => Json::String(s.clone()),
        Yaml::Sequence(items) => {
            Json::Array(items.iter().map(yaml_to_json).collect::<Result<_, _>>()?)
        }
        Yaml::Mapping(entries) => {
            let mut object = JsonMap::with_capacity(entries.len());
            for (key, value) in entries {
                object.insert(mapping_key(key)?, yaml_to_json(value)?);
            }
            Json::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value)?,
    })
}

fn number(n: &serde_yaml::Number) -> Result<Number, YamlConversionError> {
    if let Some(i) = n.as_i64() {
        return Ok(Number::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Number::from(u));
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .ok_or_else(|| YamlConversionError::NonFiniteNumber(n.to_string()))
}

fn mapping_key(key: &Yaml) -> Result<String, YamlConversionError> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => mapping_key(&tagged.value),
        Yaml::Sequence(_) => Err(YamlConversionError::UnsupportedKey("sequence")),
        Yaml::Mapping(_) => Err(YamlConversionError::UnsupportedKey("mapping")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(raw: &str) -> Result<Json, YamlConversionError> {
        let yaml: Yaml = serde_yaml::from_str(raw).unwrap();
        yaml_to_json(&yaml)
    }

    #[test]
    fn test_nested_document() {
        let value = convert("name: box\nsize: [1, 2.5]\nopen: true\nlid: ~\n").unwrap();
        assert_eq!(
            value,
            json!({"name": "box", "size": [1, 2.5], "open": true, "lid": null})
        );
    }

    #[test]
    fn test_scalar_keys_become_text() {
        assert_eq!(
            convert("1: a\ntrue: b\n~: c\n").unwrap(),
            json!({"1": "a", "true": "b", "null": "c"})
        );
    }

    #[test]
    fn test_quoted_scalars_stay_strings() {
        assert_eq!(convert("id: '42'\n").unwrap(), json!({"id": "42"}));
    }

    #[test]
    fn test_mapping_order_is_kept() {
        let value = convert("zeta: 1\nalpha: 2\n").unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn test_collection_key_rejected() {
        assert_eq!(
            convert("? [a, b]\n: c\n").unwrap_err(),
            YamlConversionError::UnsupportedKey("sequence")
        );
    }

    #[test]
    fn test_non_finite_number_rejected() {
        assert!(matches!(
            convert("x: .inf\n").unwrap_err(),
            YamlConversionError::NonFiniteNumber(_)
        ));
    }
}
