//! # schemacast-schema — Schema Evaluation & Decoding
//!
//! Validates JSON-like trees against a schema document and, in the same
//! pass, decodes string leaves that declare a `format` into semantic values.
//!
//! ## Pipeline
//!
//! ```text
//! schema document ──compile──▶ Schema tree + $ref pointer table
//!                                      │
//! instance (JSON / YAML / Value) ──evaluate──▶ decoded output Value
//! ```
//!
//! - [`compile`] turns the raw document into the typed [`Schema`] model and
//!   resolves every local `$ref` up front.
//! - [`evaluator`] walks the compiled tree; the per-concern checkers live in
//!   `composition`, `conditional`, `object`, `array`, `string` and `number`.
//! - [`Validator`] bundles a compiled schema with its format registry and
//!   [`EvaluatorConfig`]; the free functions build one per call.
//!
//! ## Crate Policy
//!
//! - Depends only on `schemacast-core` internally.
//! - Evaluation stops at the first violation; no partial output is returned.
//! - Instances are borrowed and never mutated; outputs are fresh trees.

pub mod compile;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod resolver;
pub mod validator;
pub mod yaml;

mod array;
mod composition;
mod conditional;
mod number;
mod object;
mod string;

pub use compile::{compile_document, CompiledSchema};
pub use config::EvaluatorConfig;
pub use error::{Error, SchemaError, YamlConversionError};
pub use evaluator::{Depth, SchemaEvaluator};
pub use model::Schema;
pub use resolver::ReferenceResolver;
pub use validator::{check_raw, check_value, parse_and_validate, validate, Validator};
