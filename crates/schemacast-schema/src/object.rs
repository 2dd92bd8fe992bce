//! Object instances: property counts, then `properties`, `patternProperties`
//! and `additionalProperties`, each claiming the keys it evaluates.
//!
//! The output holds exactly the input's keys, in the input's order. Keys that
//! no keyword claims are copied unchanged unless `additionalProperties` says
//! otherwise.

use std::collections::HashMap;

use schemacast_core::{Map, Value, Violation, ViolationKind};

use crate::evaluator::{type_mismatch, Depth, SchemaEvaluator};
use crate::model::{ObjectRules, Schema};

pub(crate) fn evaluate(
    ev: &SchemaEvaluator<'_>,
    instance: &Value,
    rules: &ObjectRules,
    depth: Depth,
) -> Result<Value, Violation> {
    let Value::Object(map) = instance else {
        return Err(type_mismatch("object", instance));
    };
    check_count(map.len(), rules)?;

    let next = depth.descend();
    let mut claimed: HashMap<&str, Value> = HashMap::new();

    for (name, schema) in &rules.properties {
        if let Some(value) = map.get(name) {
            claimed.insert(name.as_str(), ev.evaluate(value, schema, next)?);
        }
    }

    for (key, value) in map {
        if claimed.contains_key(key.as_str()) {
            continue;
        }
        let matched = rules
            .pattern_properties
            .iter()
            .find(|(pattern, _)| pattern.is_match(key));
        if let Some((_, schema)) = matched {
            claimed.insert(key.as_str(), ev.evaluate(value, schema, next)?);
        }
    }

    if let Some(Schema::Bool(false)) = &rules.additional_properties {
        if let Some(key) = map.keys().find(|key| !claimed.contains_key(key.as_str())) {
            return Err(Violation::new(
                ViolationKind::AdditionalPropertiesNotAllowed,
                format!("additional property \"{key}\" is not allowed"),
            ));
        }
    }

    let mut output = Map::with_capacity(map.len());
    for (key, value) in map {
        let out = match (claimed.remove(key.as_str()), &rules.additional_properties) {
            (Some(out), _) => out,
            (None, Some(schema)) => ev.evaluate(value, schema, next)?,
            (None, None) => value.clone(),
        };
        output.insert(key.clone(), out);
    }

    Ok(Value::Object(output))
}

fn check_count(count: usize, rules: &ObjectRules) -> Result<(), Violation> {
    if let Some(min) = rules.min_properties {
        if count < min {
            return Err(Violation::new(
                ViolationKind::LengthViolation,
                format!("object has {count} properties, fewer than minProperties {min}"),
            ));
        }
    }
    if let Some(max) = rules.max_properties {
        if count > max {
            return Err(Violation::new(
                ViolationKind::LengthViolation,
                format!("object has {count} properties, more than maxProperties {max}"),
            ));
        }
    }
    Ok(())
}
