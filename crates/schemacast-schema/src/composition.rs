//! # Composition Keywords
//!
//! `not`, `allOf`, `anyOf` and `oneOf` over pre-merged variants.
//!
//! When several keywords co-occur they are applied in that order and all
//! must hold. The output comes from the first of `allOf` / `anyOf` / `oneOf`
//! present; with only `not`, the base schema is evaluated for the output.
//!
//! Output selection per keyword:
//!
//! | keyword | output                                        |
//! |---------|-----------------------------------------------|
//! | `allOf` | first declared variant                        |
//! | `anyOf` | first success scanning from the last variant  |
//! | `oneOf` | the single matching variant                   |

use schemacast_core::{Value, Violation, ViolationKind};

use crate::evaluator::{is_inconclusive, Depth, SchemaEvaluator};
use crate::model::{Composition, Schema};

pub(crate) fn evaluate(
    ev: &SchemaEvaluator<'_>,
    instance: &Value,
    composition: &Composition,
    depth: Depth,
) -> Result<Value, Violation> {
    if let Some(not) = &composition.not {
        if ev.accepts(instance, not, depth)? {
            return Err(Violation::new(
                ViolationKind::NotViolated,
                "value matches the `not` schema",
            ));
        }
    }

    let mut output = None;
    if let Some(variants) = &composition.all_of {
        let result = all_of(ev, instance, variants, depth)?;
        output = output.or(result);
    }
    if let Some(variants) = &composition.any_of {
        let result = any_of(ev, instance, variants, depth)?;
        output = output.or(Some(result));
    }
    if let Some(variants) = &composition.one_of {
        let result = one_of(ev, instance, variants, depth)?;
        output = output.or(Some(result));
    }

    match output {
        Some(value) => Ok(value),
        None => ev.evaluate(instance, &composition.base, depth),
    }
}

/// Every variant must hold. Returns the first variant's output (`None` for
/// an empty list).
fn all_of(
    ev: &SchemaEvaluator<'_>,
    instance: &Value,
    variants: &[Schema],
    depth: Depth,
) -> Result<Option<Value>, Violation> {
    let mut first = None;
    for (index, variant) in variants.iter().enumerate() {
        match ev.evaluate(instance, variant, depth) {
            Ok(out) => {
                first.get_or_insert(out);
            }
            Err(e) if is_inconclusive(&e) => return Err(e),
            Err(e) => {
                tracing::debug!(index, kind = %e.kind(), "allOf variant failed");
                return Err(Violation::new(
                    ViolationKind::AllOfFailed,
                    format!("allOf[{index}] failed"),
                )
                .caused_by(e));
            }
        }
    }
    Ok(first)
}

fn any_of(
    ev: &SchemaEvaluator<'_>,
    instance: &Value,
    variants: &[Schema],
    depth: Depth,
) -> Result<Value, Violation> {
    let mut last_failure = None;
    for (index, variant) in variants.iter().enumerate().rev() {
        match ev.evaluate(instance, variant, depth) {
            Ok(out) => {
                tracing::trace!(index, "anyOf variant matched");
                return Ok(out);
            }
            Err(e) if is_inconclusive(&e) => return Err(e),
            Err(e) => {
                tracing::trace!(index, kind = %e.kind(), "anyOf variant rejected");
                last_failure = Some(e);
            }
        }
    }
    tracing::debug!(variants = variants.len(), "anyOf exhausted");
    let violation = Violation::new(
        ViolationKind::AnyOfExhausted,
        format!("none of the {} anyOf variants matched", variants.len()),
    );
    Err(match last_failure {
        Some(cause) => violation.caused_by(cause),
        None => violation,
    })
}

fn one_of(
    ev: &SchemaEvaluator<'_>,
    instance: &Value,
    variants: &[Schema],
    depth: Depth,
) -> Result<Value, Violation> {
    let mut matched = 0usize;
    let mut output = None;
    for (index, variant) in variants.iter().enumerate() {
        match ev.evaluate(instance, variant, depth) {
            Ok(out) => {
                tracing::trace!(index, "oneOf variant matched");
                matched += 1;
                output.get_or_insert(out);
            }
            Err(e) if is_inconclusive(&e) => return Err(e),
            Err(_) => {}
        }
    }
    match (matched, output) {
        (1, Some(out)) => Ok(out),
        (count, _) => {
            tracing::debug!(matched = count, "oneOf did not match exactly one variant");
            Err(Violation::new(
                ViolationKind::OneOfAmbiguous,
                format!("{count} oneOf variants matched, expected exactly one"),
            ))
        }
    }
}
