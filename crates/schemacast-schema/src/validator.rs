//! # Validator & Entry Points
//!
//! [`Validator`] is the reusable, compiled form of a schema: the typed tree,
//! its `$ref` pointer table, the format registry and the evaluator settings.
//! It is immutable after construction and `Send + Sync`, so one validator can
//! serve any number of evaluations concurrently.
//!
//! The free functions ([`parse_and_validate`], [`validate`], [`check_raw`],
//! [`check_value`]) compile a throwaway validator per call.

use std::sync::Arc;

use schemacast_core::{encode, Format, FormatRegistry, Value, Violation};

use crate::compile::{compile_document, CompiledSchema};
use crate::config::EvaluatorConfig;
use crate::error::{Error, SchemaError};
use crate::evaluator::{Depth, SchemaEvaluator};
use crate::model::Schema;
use crate::yaml::yaml_to_json;

/// A compiled schema ready to evaluate instances.
#[derive(Debug, Clone)]
pub struct Validator {
    compiled: CompiledSchema,
    formats: FormatRegistry,
    config: EvaluatorConfig,
}

impl Validator {
    /// Compile `schema` with the built-in formats and default settings.
    pub fn new(schema: &serde_json::Value) -> Result<Self, SchemaError> {
        Self::with_config(schema, Vec::new(), EvaluatorConfig::default())
    }

    /// Compile `schema` with caller formats merged over the built-ins.
    pub fn with_formats(
        schema: &serde_json::Value,
        formats: impl IntoIterator<Item = Arc<dyn Format>>,
    ) -> Result<Self, SchemaError> {
        Self::with_config(schema, formats, EvaluatorConfig::default())
    }

    /// Compile `schema` with caller formats and explicit settings.
    pub fn with_config(
        schema: &serde_json::Value,
        formats: impl IntoIterator<Item = Arc<dyn Format>>,
        config: EvaluatorConfig,
    ) -> Result<Self, SchemaError> {
        let compiled = compile_document(schema)?;
        let formats = FormatRegistry::with_formats(formats);
        tracing::debug!(
            formats = formats.len(),
            max_depth = config.max_depth,
            "validator ready"
        );
        Ok(Self {
            compiled,
            formats,
            config,
        })
    }

    /// The compiled root schema.
    pub fn schema(&self) -> &Schema {
        &self.compiled.root
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate an instance tree, returning the decoded output.
    pub fn evaluate(&self, instance: &Value) -> Result<Value, Violation> {
        SchemaEvaluator::new(&self.compiled.resolver, &self.formats, &self.config).evaluate(
            instance,
            &self.compiled.root,
            Depth::ROOT,
        )
    }

    /// Evaluate a JSON tree, returning the decoded output.
    pub fn validate(&self, instance: &serde_json::Value) -> Result<Value, Violation> {
        self.evaluate(&Value::from(instance))
    }

    /// Validate a JSON tree, discarding the output.
    pub fn check(&self, instance: &serde_json::Value) -> Result<(), Violation> {
        self.validate(instance).map(drop)
    }

    /// Parse JSON text and evaluate it.
    pub fn loads(&self, raw: &str) -> Result<Value, Error> {
        let instance: serde_json::Value = serde_json::from_str(raw)?;
        Ok(self.validate(&instance)?)
    }

    /// Parse YAML text and evaluate it.
    pub fn loads_yaml(&self, raw: &str) -> Result<Value, Error> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(raw)?;
        let instance = yaml_to_json(&yaml)?;
        Ok(self.validate(&instance)?)
    }

    /// Parse JSON text and validate it, discarding the output.
    pub fn check_raw(&self, raw: &str) -> Result<(), Error> {
        self.loads(raw).map(drop)
    }

    /// Encode an output tree back to JSON text with this validator's formats.
    pub fn dumps(&self, value: &Value) -> Result<String, Error> {
        Ok(encode::to_string(value, &self.formats)?)
    }
}

/// Parse `raw` as JSON and evaluate it against `schema`.
pub fn parse_and_validate(
    raw: &str,
    schema: &serde_json::Value,
    extra_formats: &[Arc<dyn Format>],
) -> Result<Value, Error> {
    Validator::with_formats(schema, extra_formats.iter().cloned())?.loads(raw)
}

/// Evaluate an already-parsed JSON tree against `schema`.
pub fn validate(
    instance: &serde_json::Value,
    schema: &serde_json::Value,
    extra_formats: &[Arc<dyn Format>],
) -> Result<Value, Error> {
    Ok(Validator::with_formats(schema, extra_formats.iter().cloned())?.validate(instance)?)
}

/// Parse and validate `raw` with the built-in formats, discarding the output.
pub fn check_raw(raw: &str, schema: &serde_json::Value) -> Result<(), Error> {
    Validator::new(schema)?.check_raw(raw)
}

/// Validate a JSON tree with the built-in formats, discarding the output.
pub fn check_value(instance: &serde_json::Value, schema: &serde_json::Value) -> Result<(), Error> {
    Ok(Validator::new(schema)?.check(instance)?)
}
