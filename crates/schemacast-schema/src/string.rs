//! String instances: length bounds, whole-string `pattern`, then `format`
//! decoding through the evaluator's registry.
//!
//! A value that a format has already decoded (a timestamp, an address, ...)
//! is accepted unchanged, so evaluating an output tree again is a no-op.

use schemacast_core::{Value, Violation, ViolationKind};

use crate::evaluator::{type_mismatch, SchemaEvaluator};
use crate::model::StringRules;

pub(crate) fn evaluate(
    ev: &SchemaEvaluator<'_>,
    instance: &Value,
    rules: &StringRules,
) -> Result<Value, Violation> {
    let raw = match instance {
        Value::String(s) => s,
        decoded if decoded.is_decoded() => return Ok(decoded.clone()),
        other => return Err(type_mismatch("string", other)),
    };

    let length = raw.chars().count();
    if let Some(min) = rules.min_length {
        if length < min {
            return Err(Violation::new(
                ViolationKind::LengthViolation,
                format!("string has {length} characters, fewer than minLength {min}"),
            ));
        }
    }
    if let Some(max) = rules.max_length {
        if length > max {
            return Err(Violation::new(
                ViolationKind::LengthViolation,
                format!("string has {length} characters, more than maxLength {max}"),
            ));
        }
    }

    if let Some(pattern) = &rules.pattern {
        if !pattern.regex.is_match(raw) {
            return Err(Violation::new(
                ViolationKind::PatternMismatch,
                format!("{raw:?} does not match pattern {:?}", pattern.source),
            ));
        }
    }

    let Some(symbol) = &rules.format else {
        return Ok(instance.clone());
    };
    let format = ev.formats().get(symbol).ok_or_else(|| {
        Violation::new(
            ViolationKind::UnsupportedFormat,
            format!("format {symbol} is not supported"),
        )
    })?;
    format.decode(raw).map_err(|e| {
        Violation::new(
            ViolationKind::FormatError,
            format!("error in formatting data, format: {symbol}"),
        )
        .with_format_error(e)
    })
}
