//! Array instances: item counts, `contains`, `uniqueItems`, then per-element
//! evaluation through `prefixItems` and `items`.

use schemacast_core::{Value, Violation, ViolationKind};

use crate::evaluator::{type_mismatch, Depth, SchemaEvaluator};
use crate::model::{ArrayRules, Schema};

pub(crate) fn evaluate(
    ev: &SchemaEvaluator<'_>,
    instance: &Value,
    rules: &ArrayRules,
    depth: Depth,
) -> Result<Value, Violation> {
    let Value::Array(items) = instance else {
        return Err(type_mismatch("array", instance));
    };
    let next = depth.descend();

    check_count(items.len(), rules)?;
    if let Some(contains) = &rules.contains {
        check_contains(ev, items, contains, rules, next)?;
    }
    if rules.unique_items {
        check_unique(items)?;
    }

    let prefix = rules.prefix_items.as_deref().unwrap_or(&[]);
    let mut output = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let schema = match prefix.get(index) {
            Some(schema) => schema,
            None => match &rules.items {
                Some(Schema::Bool(false)) => {
                    return Err(Violation::new(
                        ViolationKind::AdditionalItemsNotAllowed,
                        format!(
                            "array has {} items, only {} allowed by prefixItems",
                            items.len(),
                            prefix.len()
                        ),
                    ))
                }
                Some(schema) => schema,
                None => {
                    output.push(item.clone());
                    continue;
                }
            },
        };
        output.push(ev.evaluate(item, schema, next)?);
    }

    Ok(Value::Array(output))
}

fn check_count(count: usize, rules: &ArrayRules) -> Result<(), Violation> {
    if let Some(min) = rules.min_items {
        if count < min {
            return Err(Violation::new(
                ViolationKind::LengthViolation,
                format!("array has {count} items, fewer than minItems {min}"),
            ));
        }
    }
    if let Some(max) = rules.max_items {
        if count > max {
            return Err(Violation::new(
                ViolationKind::LengthViolation,
                format!("array has {count} items, more than maxItems {max}"),
            ));
        }
    }
    Ok(())
}

fn check_contains(
    ev: &SchemaEvaluator<'_>,
    items: &[Value],
    contains: &Schema,
    rules: &ArrayRules,
    depth: Depth,
) -> Result<(), Violation> {
    let mut matches = 0usize;
    for item in items {
        if ev.accepts(item, contains, depth)? {
            matches += 1;
        }
    }
    let min = rules.min_contains.unwrap_or(1);
    if matches < min {
        return Err(Violation::new(
            ViolationKind::ContainsViolation,
            format!("{matches} items match contains, at least {min} required"),
        ));
    }
    if let Some(max) = rules.max_contains {
        if matches > max {
            return Err(Violation::new(
                ViolationKind::ContainsViolation,
                format!("{matches} items match contains, at most {max} allowed"),
            ));
        }
    }
    Ok(())
}

fn check_unique(items: &[Value]) -> Result<(), Violation> {
    for (i, left) in items.iter().enumerate() {
        if let Some(offset) = items[i + 1..].iter().position(|right| right == left) {
            return Err(Violation::new(
                ViolationKind::UniqueItemsViolation,
                format!("items {i} and {} are equal", i + 1 + offset),
            ));
        }
    }
    Ok(())
}
