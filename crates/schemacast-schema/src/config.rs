//! # Evaluator Configuration
//!
//! Tunables for a [`Validator`](crate::Validator). Loadable from JSON or
//! YAML; missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::yaml::yaml_to_json;

/// Default ceiling on instance nesting, and on `$ref` hops at one level.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default tolerance for non-integer `multipleOf` checks.
pub const DEFAULT_MULTIPLE_OF_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Deepest instance nesting (and longest `$ref` chain without descending)
    /// before `RecursionLimit`.
    pub max_depth: usize,
    /// Tolerance applied to `value / multipleOf` when either side is fractional.
    pub multiple_of_epsilon: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            multiple_of_epsilon: DEFAULT_MULTIPLE_OF_EPSILON,
        }
    }
}

impl EvaluatorConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, Error> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(raw)?;
        let json = yaml_to_json(&yaml)?;
        Ok(serde_json::from_value(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.max_depth, 256);
        assert_eq!(config.multiple_of_epsilon, 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EvaluatorConfig::from_json_str(r#"{"max_depth": 16}"#).unwrap();
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.multiple_of_epsilon, DEFAULT_MULTIPLE_OF_EPSILON);
    }

    #[test]
    fn test_yaml_config() {
        let config =
            EvaluatorConfig::from_yaml_str("max_depth: 8\nmultiple_of_epsilon: 0.001\n").unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.multiple_of_epsilon, 0.001);
    }

    #[test]
    fn test_malformed_config_rejected() {
        assert!(EvaluatorConfig::from_json_str(r#"{"max_depth": "deep"}"#).is_err());
    }
}
