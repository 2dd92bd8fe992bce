//! Conditional keywords. They only validate: nothing they evaluate reaches
//! the output tree.
//!
//! `required`, `dependentRequired` and `dependentSchemas` look at object
//! keys and are skipped for non-object instances. `if` / `then` / `else`
//! applies to any instance.

use schemacast_core::{Value, Violation, ViolationKind};

use crate::evaluator::{Depth, SchemaEvaluator};
use crate::model::Conditional;

pub(crate) fn check(
    ev: &SchemaEvaluator<'_>,
    instance: &Value,
    rules: &Conditional,
    depth: Depth,
) -> Result<(), Violation> {
    if let Value::Object(map) = instance {
        if let Some(missing) = rules.required.iter().find(|key| !map.contains_key(*key)) {
            return Err(Violation::new(
                ViolationKind::RequiredFieldMissing,
                format!("field \"{missing}\" is required"),
            ));
        }

        for (trigger, dependencies) in &rules.dependent_required {
            if !map.contains_key(trigger) {
                continue;
            }
            if let Some(missing) = dependencies.iter().find(|key| !map.contains_key(*key)) {
                return Err(Violation::new(
                    ViolationKind::DependentRequiredViolation,
                    format!("field \"{missing}\" is required when \"{trigger}\" is present"),
                ));
            }
        }

        for (trigger, schema) in &rules.dependent_schemas {
            if map.contains_key(trigger) {
                ev.evaluate(instance, schema, depth)?;
            }
        }
    }

    if let Some(branch) = &rules.if_then_else {
        let selected = if ev.accepts(instance, &branch.condition, depth)? {
            &branch.then
        } else {
            &branch.otherwise
        };
        if let Some(schema) = selected {
            ev.evaluate(instance, schema, depth)?;
        }
    }

    Ok(())
}
