//! # Schema Evaluator
//!
//! Recursive descent over a compiled [`Schema`]: validates an instance and
//! builds the decoded output tree in the same pass.
//!
//! ## Dispatch
//!
//! 1. Boolean schemas accept or reject outright.
//! 2. `$ref` evaluates the resolved target.
//! 3. Composite schemas go through [`composition`](crate::composition).
//! 4. Typed nodes run conditionals (validation only), then `const`, then
//!    `enum`, then the type-specific checker selected by `type`. A node
//!    without `type` returns the instance unchanged.
//!
//! [`Depth`] tracks how far evaluation has descended into the instance,
//! plus the `$ref` hops taken since the last descent. Either one passing
//! [`EvaluatorConfig::max_depth`] fails with `RecursionLimit`. Composition
//! variants and conditionals apply to the same value and do not count.
//!
//! `RecursionLimit` and `UnsupportedKeyword` say nothing about the instance,
//! so trial evaluations (`not`, `anyOf`, `oneOf`, `if`, `contains`, `type`
//! lists) propagate them instead of counting them as a non-match.

use schemacast_core::{FormatRegistry, Value, Violation, ViolationKind};

use crate::config::EvaluatorConfig;
use crate::model::{Node, Schema, TypeKeyword, TypeSet};
use crate::resolver::ReferenceResolver;
use crate::{array, composition, conditional, number, object, string};

/// Where an evaluation sits: instance nesting level and `$ref` hops taken at
/// that level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Depth {
    level: usize,
    hops: usize,
}

impl Depth {
    /// The top of the instance.
    pub const ROOT: Depth = Depth { level: 0, hops: 0 };

    /// Nesting level of the instance value being evaluated.
    pub fn level(self) -> usize {
        self.level
    }

    /// Move into an object member or array element.
    pub(crate) fn descend(self) -> Self {
        Self {
            level: self.level + 1,
            hops: 0,
        }
    }

    fn hop(self) -> Self {
        Self {
            hops: self.hops + 1,
            ..self
        }
    }
}

/// Borrowed evaluation context. Cheap to build per call.
#[derive(Debug, Clone, Copy)]
pub struct SchemaEvaluator<'a> {
    resolver: &'a ReferenceResolver,
    formats: &'a FormatRegistry,
    config: &'a EvaluatorConfig,
}

impl<'a> SchemaEvaluator<'a> {
    pub fn new(
        resolver: &'a ReferenceResolver,
        formats: &'a FormatRegistry,
        config: &'a EvaluatorConfig,
    ) -> Self {
        Self {
            resolver,
            formats,
            config,
        }
    }

    pub fn formats(&self) -> &'a FormatRegistry {
        self.formats
    }

    pub fn config(&self) -> &'a EvaluatorConfig {
        self.config
    }

    /// Evaluate `instance` against `schema` at `depth`.
    pub fn evaluate(&self, instance: &Value, schema: &Schema, depth: Depth) -> Result<Value, Violation> {
        let max = self.config.max_depth;
        if depth.level > max {
            return Err(Violation::new(
                ViolationKind::RecursionLimit,
                format!("instance nested deeper than {max}"),
            ));
        }
        if depth.hops > max {
            return Err(Violation::new(
                ViolationKind::RecursionLimit,
                format!("more than {max} $ref hops without descending into the instance"),
            ));
        }
        match schema {
            Schema::Bool(true) => Ok(instance.clone()),
            Schema::Bool(false) => Err(Violation::new(
                ViolationKind::TypeMismatch,
                "schema `false` admits no instance",
            )),
            Schema::Ref(pointer) => {
                tracing::trace!(
                    pointer = %pointer,
                    level = depth.level,
                    hops = depth.hops,
                    "following $ref"
                );
                let target = self.resolver.resolve(pointer)?;
                self.evaluate(instance, target, depth.hop())
            }
            Schema::Composite(c) => composition::evaluate(self, instance, c, depth),
            Schema::Typed(node) => self.evaluate_node(instance, node, depth),
        }
    }

    /// Whether `instance` satisfies `schema`; the output is discarded.
    ///
    /// Inconclusive failures (`RecursionLimit`, `UnsupportedKeyword`) are
    /// returned as `Err` rather than `false`.
    pub fn accepts(&self, instance: &Value, schema: &Schema, depth: Depth) -> Result<bool, Violation> {
        match self.evaluate(instance, schema, depth) {
            Ok(_) => Ok(true),
            Err(e) if is_inconclusive(&e) => Err(e),
            Err(_) => Ok(false),
        }
    }

    fn evaluate_node(&self, instance: &Value, node: &Node, depth: Depth) -> Result<Value, Violation> {
        if let Some(keyword) = &node.unsupported {
            return Err(Violation::new(
                ViolationKind::UnsupportedKeyword,
                format!("keyword {keyword} is not supported"),
            ));
        }
        if !node.conditional.is_empty() {
            conditional::check(self, instance, &node.conditional, depth)?;
        }

        if let Some(expected) = &node.constant {
            if instance != expected {
                return Err(Violation::new(
                    ViolationKind::ConstMismatch,
                    format!("value does not equal const {expected:?}"),
                ));
            }
            return Ok(instance.clone());
        }

        if let Some(members) = &node.enumeration {
            if !members.contains(instance) {
                return Err(Violation::new(
                    ViolationKind::EnumMismatch,
                    format!("value is not one of {} enum members", members.len()),
                ));
            }
        }

        match &node.types {
            None => Ok(instance.clone()),
            Some(TypeSet::One(keyword)) => self.evaluate_type(instance, keyword, node, depth),
            Some(TypeSet::AnyOf(keywords)) => {
                let mut first_failure = None;
                for keyword in keywords {
                    match self.evaluate_type(instance, keyword, node, depth) {
                        Ok(output) => return Ok(output),
                        Err(e) if is_inconclusive(&e) => return Err(e),
                        Err(e) => {
                            first_failure.get_or_insert(e);
                        }
                    }
                }
                let names: Vec<&str> = keywords.iter().map(TypeKeyword::name).collect();
                let violation = Violation::new(
                    ViolationKind::TypeMismatch,
                    format!(
                        "{} matches none of the types [{}]",
                        instance.type_name(),
                        names.join(", ")
                    ),
                );
                Err(match first_failure {
                    Some(cause) => violation.caused_by(cause),
                    None => violation,
                })
            }
        }
    }

    fn evaluate_type(
        &self,
        instance: &Value,
        keyword: &TypeKeyword,
        node: &Node,
        depth: Depth,
    ) -> Result<Value, Violation> {
        match keyword {
            TypeKeyword::Object => object::evaluate(self, instance, &node.object, depth),
            TypeKeyword::Array => array::evaluate(self, instance, &node.array, depth),
            TypeKeyword::String => string::evaluate(self, instance, &node.string),
            TypeKeyword::Number | TypeKeyword::Integer => {
                number::evaluate(instance, &node.number, self.config)
            }
            TypeKeyword::Boolean => match instance {
                Value::Bool(_) => Ok(instance.clone()),
                other => Err(type_mismatch("boolean", other)),
            },
            TypeKeyword::Null => match instance {
                Value::Null => Ok(Value::Null),
                other => Err(type_mismatch("null", other)),
            },
            TypeKeyword::Unsupported(name) => Err(Violation::new(
                ViolationKind::UnsupportedType,
                format!("type {name} is not supported"),
            )),
        }
    }
}

/// True for failures that say nothing about the instance itself.
pub(crate) fn is_inconclusive(violation: &Violation) -> bool {
    matches!(
        violation.kind(),
        ViolationKind::RecursionLimit | ViolationKind::UnsupportedKeyword
    )
}

/// `TypeMismatch` naming the expected and actual types.
pub(crate) fn type_mismatch(expected: &str, actual: &Value) -> Violation {
    Violation::new(
        ViolationKind::TypeMismatch,
        format!("expected {expected}, got {}", actual.type_name()),
    )
}
