//! # Compiled Schema Model
//!
//! A schema document is compiled once into the typed tree defined here, so
//! evaluation dispatches by exhaustive `match` instead of probing a loosely
//! typed map for keywords at every step.
//!
//! ```text
//! Schema
//! ├── Bool(true | false)       boolean schemas
//! ├── Ref(pointer)             `$ref` (sibling keywords are dropped)
//! ├── Composite(Composition)   `allOf` / `anyOf` / `oneOf` / `not`
//! └── Typed(Node)              everything else, grouped by concern
//! ```
//!
//! Composition variants are stored pre-merged: each one is the enclosing
//! schema's non-composition keywords overlaid with the variant's own
//! keywords, variant keys winning.

use regex::Regex;
use serde_json::Number;

use schemacast_core::Value;

/// A compiled schema.
#[derive(Debug, Clone)]
pub enum Schema {
    /// `true` accepts every instance unchanged; `false` rejects every instance.
    Bool(bool),
    /// A local JSON pointer (`#`, `#/$defs/name`, ...).
    Ref(String),
    /// A schema carrying at least one composition keyword.
    Composite(Box<Composition>),
    /// A schema with no `$ref` and no composition keywords.
    Typed(Box<Node>),
}

/// `allOf` / `anyOf` / `oneOf` / `not`, with each variant pre-merged.
#[derive(Debug, Clone)]
pub struct Composition {
    /// The enclosing schema with its composition keywords removed.
    pub base: Schema,
    /// Merged `not` variant.
    pub not: Option<Schema>,
    /// Merged `allOf` variants, in declaration order.
    pub all_of: Option<Vec<Schema>>,
    /// Merged `anyOf` variants, in declaration order.
    pub any_of: Option<Vec<Schema>>,
    /// Merged `oneOf` variants, in declaration order.
    pub one_of: Option<Vec<Schema>>,
}

/// A single entry of the `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKeyword {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
    /// Anything else; fails with `UnsupportedType` when reached.
    Unsupported(String),
}

impl TypeKeyword {
    /// Map a `type` name to its keyword.
    pub fn from_name(name: &str) -> Self {
        match name {
            "object" => Self::Object,
            "array" => Self::Array,
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "null" => Self::Null,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// The keyword as written in a schema.
    pub fn name(&self) -> &str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Unsupported(name) => name,
        }
    }
}

/// The `type` keyword: a single name or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSet {
    One(TypeKeyword),
    AnyOf(Vec<TypeKeyword>),
}

/// Every non-composition keyword of a schema, grouped by concern.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// First keyword present that the evaluator does not implement.
    pub unsupported: Option<String>,
    pub types: Option<TypeSet>,
    pub constant: Option<Value>,
    pub enumeration: Option<Vec<Value>>,
    pub conditional: Conditional,
    pub object: ObjectRules,
    pub array: ArrayRules,
    pub string: StringRules,
    pub number: NumberRules,
}

/// `if` with its optional `then` and `else` branches.
#[derive(Debug, Clone)]
pub struct IfThenElse {
    pub condition: Schema,
    pub then: Option<Schema>,
    pub otherwise: Option<Schema>,
}

/// Validation-only keywords: they never change the output.
#[derive(Debug, Clone, Default)]
pub struct Conditional {
    pub required: Vec<String>,
    pub dependent_required: Vec<(String, Vec<String>)>,
    pub dependent_schemas: Vec<(String, Schema)>,
    pub if_then_else: Option<IfThenElse>,
}

impl Conditional {
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
            && self.dependent_required.is_empty()
            && self.dependent_schemas.is_empty()
            && self.if_then_else.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectRules {
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
    /// `properties`, in declaration order.
    pub properties: Vec<(String, Schema)>,
    /// `patternProperties`, in declaration order; matched by unanchored search.
    pub pattern_properties: Vec<(Regex, Schema)>,
    pub additional_properties: Option<Schema>,
}

#[derive(Debug, Clone, Default)]
pub struct ArrayRules {
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub prefix_items: Option<Vec<Schema>>,
    pub items: Option<Schema>,
    pub contains: Option<Schema>,
    pub min_contains: Option<usize>,
    pub max_contains: Option<usize>,
    pub unique_items: bool,
}

/// A `pattern` compiled for whole-string matching.
#[derive(Debug, Clone)]
pub struct FullMatch {
    /// The pattern as written in the schema.
    pub source: String,
    /// `source` anchored at both ends.
    pub regex: Regex,
}

#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<FullMatch>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NumberRules {
    pub minimum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    /// Kept as a JSON number so integer divisors can be checked exactly.
    pub multiple_of: Option<Number>,
}
