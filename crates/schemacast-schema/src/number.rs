//! Number instances (`number` and `integer` alike): range bounds and
//! `multipleOf`.

use serde_json::Number;

use schemacast_core::{Value, Violation, ViolationKind};

use crate::config::EvaluatorConfig;
use crate::evaluator::type_mismatch;
use crate::model::NumberRules;

pub(crate) fn evaluate(
    instance: &Value,
    rules: &NumberRules,
    config: &EvaluatorConfig,
) -> Result<Value, Violation> {
    let Value::Number(n) = instance else {
        return Err(type_mismatch("number", instance));
    };
    let value = n
        .as_f64()
        .ok_or_else(|| type_mismatch("a finite number", instance))?;

    let out_of_range = |message: String| Err(Violation::new(ViolationKind::RangeViolation, message));
    if let Some(min) = rules.minimum {
        if value < min {
            return out_of_range(format!("{n} is less than minimum {min}"));
        }
    }
    if let Some(min) = rules.exclusive_minimum {
        if value <= min {
            return out_of_range(format!("{n} is not greater than exclusiveMinimum {min}"));
        }
    }
    if let Some(max) = rules.maximum {
        if value > max {
            return out_of_range(format!("{n} is greater than maximum {max}"));
        }
    }
    if let Some(max) = rules.exclusive_maximum {
        if value >= max {
            return out_of_range(format!("{n} is not less than exclusiveMaximum {max}"));
        }
    }

    if let Some(divisor) = &rules.multiple_of {
        if !is_multiple(n, divisor, config.multiple_of_epsilon) {
            return Err(Violation::new(
                ViolationKind::MultipleOfViolation,
                format!("{n} is not a multiple of {divisor}"),
            ));
        }
    }

    Ok(instance.clone())
}

/// Exact when both sides are integers, otherwise the quotient must be within
/// `epsilon` of an integer.
fn is_multiple(value: &Number, divisor: &Number, epsilon: f64) -> bool {
    if let (Some(v), Some(d)) = (value.as_i64(), divisor.as_i64()) {
        return d != 0 && v % d == 0;
    }
    if let (Some(v), Some(d)) = (value.as_u64(), divisor.as_u64()) {
        return d != 0 && v % d == 0;
    }
    match (value.as_f64(), divisor.as_f64()) {
        (Some(v), Some(d)) if d != 0.0 => {
            let quotient = v / d;
            quotient.is_finite() && (quotient - quotient.round()).abs() <= epsilon
        }
        _ => false,
    }
}
