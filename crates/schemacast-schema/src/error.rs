//! # Error Types
//!
//! Two layers of failure:
//!
//! - [`SchemaError`] is raised while compiling a schema document, before any
//!   instance is seen (a keyword with the wrong JSON type, a regex that does
//!   not compile).
//! - [`Error`] is what the document-level entry points return: parse failures
//!   of the input text, schema compile failures, and the evaluation
//!   [`Violation`] itself.

use thiserror::Error;

use schemacast_core::{FormatError, Violation};

/// A schema document that cannot be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A known keyword carries a value of the wrong shape.
    #[error("keyword '{keyword}': {reason}")]
    InvalidKeyword { keyword: String, reason: String },

    /// `pattern` or a `patternProperties` key is not a valid regex.
    #[error("keyword '{keyword}': invalid regular expression {pattern:?}: {reason}")]
    InvalidPattern {
        keyword: String,
        pattern: String,
        reason: String,
    },

    /// A schema position holds something other than an object or a boolean.
    #[error("expected a schema object or boolean at '{keyword}', found {found}")]
    NotASchema { keyword: String, found: String },
}

impl SchemaError {
    pub(crate) fn invalid(keyword: &str, reason: impl Into<String>) -> Self {
        Self::InvalidKeyword {
            keyword: keyword.to_string(),
            reason: reason.into(),
        }
    }
}

/// A YAML document with no JSON equivalent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YamlConversionError {
    /// `.inf` / `.nan` and other numbers JSON cannot carry.
    #[error("number {0} cannot be represented in JSON")]
    NonFiniteNumber(String),

    /// A mapping key that is itself a collection.
    #[error("{0} used as a mapping key")]
    UnsupportedKey(&'static str),
}

/// Errors returned by the document-level entry points.
#[derive(Error, Debug)]
pub enum Error {
    /// The input text is not valid JSON.
    #[error("invalid JSON document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The input text is not valid YAML.
    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The YAML parsed but cannot be represented as JSON.
    #[error("YAML-to-JSON conversion failed: {0}")]
    YamlConversion(#[from] YamlConversionError),

    /// The schema document does not compile.
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),

    /// The instance does not satisfy the schema.
    #[error("schema violation: {0}")]
    Violation(#[from] Violation),

    /// An output tree could not be encoded back to JSON.
    #[error("encoding failed: {0}")]
    Encode(#[from] FormatError),
}

impl Error {
    /// The violation, if this error is an evaluation failure.
    pub fn as_violation(&self) -> Option<&Violation> {
        match self {
            Self::Violation(v) => Some(v),
            _ => None,
        }
    }
}
