//! # Schema Compilation
//!
//! Turns a raw schema document into the typed [`Schema`] tree plus the
//! [`ReferenceResolver`] pointer table. Compilation happens once per
//! validator; evaluation never looks at the raw document again.
//!
//! ## Rules
//!
//! - `$ref` makes a schema a [`Schema::Ref`]; sibling keywords are dropped.
//! - Composition keywords make it a [`Schema::Composite`]. Each variant is
//!   merged with the enclosing schema's other keywords at this point.
//! - Known keywords whose value has the wrong JSON shape are a
//!   [`SchemaError`]. Unknown keywords are ignored.
//! - Standard keywords the evaluator does not implement are recorded on the
//!   node and fail with `UnsupportedKeyword` when evaluation reaches them.
//! - Every `$ref` pointer seen anywhere (including inside `$ref` targets) is
//!   resolved against the root document and compiled exactly once.

use std::sync::Arc;

use regex::Regex;
use serde_json::{Map as JsonMap, Value as Json};

use schemacast_core::Value;

use crate::error::SchemaError;
use crate::model::{
    ArrayRules, Composition, Conditional, FullMatch, IfThenElse, Node, NumberRules, ObjectRules,
    Schema, StringRules, TypeKeyword, TypeSet,
};
use crate::resolver::{navigate, ReferenceResolver};

const COMPOSITION_KEYWORDS: [&str; 4] = ["allOf", "anyOf", "oneOf", "not"];

const UNSUPPORTED_KEYWORDS: [&str; 5] = [
    "unevaluatedProperties",
    "unevaluatedItems",
    "propertyNames",
    "$dynamicRef",
    "$recursiveRef",
];

/// A compiled root schema with its pointer table.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    pub root: Arc<Schema>,
    pub resolver: ReferenceResolver,
}

/// Compile a schema document.
pub fn compile_document(document: &Json) -> Result<CompiledSchema, SchemaError> {
    let mut compiler = Compiler::default();
    let root = Arc::new(compiler.schema("#", document)?);

    let mut resolver = ReferenceResolver::default();
    while let Some(pointer) = compiler.pending.pop() {
        if resolver.is_known(&pointer) {
            continue;
        }
        if pointer == "#" {
            resolver.insert(pointer, Arc::clone(&root));
            continue;
        }
        match navigate(document, &pointer) {
            Ok(raw) => {
                let target = compiler.schema(&pointer, raw)?;
                resolver.insert(pointer, Arc::new(target));
            }
            Err(reason) => resolver.mark_unresolved(pointer, reason),
        }
    }

    tracing::debug!(refs = resolver.len(), "compiled schema");
    Ok(CompiledSchema { root, resolver })
}

#[derive(Debug, Default)]
struct Compiler {
    /// `$ref` pointers seen but not yet resolved.
    pending: Vec<String>,
}

impl Compiler {
    /// Compile the value found at `keyword` as a schema.
    fn schema(&mut self, keyword: &str, raw: &Json) -> Result<Schema, SchemaError> {
        match raw {
            Json::Bool(b) => Ok(Schema::Bool(*b)),
            Json::Object(map) => self.object_schema(map),
            other => Err(SchemaError::NotASchema {
                keyword: keyword.to_string(),
                found: json_type(other).to_string(),
            }),
        }
    }

    fn object_schema(&mut self, map: &JsonMap<String, Json>) -> Result<Schema, SchemaError> {
        if let Some(target) = map.get("$ref") {
            let pointer = target
                .as_str()
                .ok_or_else(|| SchemaError::invalid("$ref", "expected a string"))?;
            self.pending.push(pointer.to_string());
            return Ok(Schema::Ref(pointer.to_string()));
        }

        if !COMPOSITION_KEYWORDS.iter().any(|k| map.contains_key(*k)) {
            return Ok(Schema::Typed(Box::new(self.node(map)?)));
        }

        let base: JsonMap<String, Json> = map
            .iter()
            .filter(|(k, _)| !COMPOSITION_KEYWORDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let not = map
            .get("not")
            .map(|raw| self.variant("not", &base, raw))
            .transpose()?;
        let all_of = self.variants("allOf", map, &base)?;
        let any_of = self.variants("anyOf", map, &base)?;
        let one_of = self.variants("oneOf", map, &base)?;

        Ok(Schema::Composite(Box::new(Composition {
            base: Schema::Typed(Box::new(self.node(&base)?)),
            not,
            all_of,
            any_of,
            one_of,
        })))
    }

    fn variants(
        &mut self,
        keyword: &str,
        map: &JsonMap<String, Json>,
        base: &JsonMap<String, Json>,
    ) -> Result<Option<Vec<Schema>>, SchemaError> {
        let Some(raw) = map.get(keyword) else {
            return Ok(None);
        };
        let items = raw
            .as_array()
            .ok_or_else(|| SchemaError::invalid(keyword, "expected an array of schemas"))?;
        items
            .iter()
            .map(|item| self.variant(keyword, base, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Overlay a variant on the base keywords; variant keys win.
    fn variant(
        &mut self,
        keyword: &str,
        base: &JsonMap<String, Json>,
        raw: &Json,
    ) -> Result<Schema, SchemaError> {
        match raw {
            Json::Bool(true) => self.object_schema(base),
            Json::Bool(false) => Ok(Schema::Bool(false)),
            Json::Object(own) => {
                let mut merged = base.clone();
                for (k, v) in own {
                    merged.insert(k.clone(), v.clone());
                }
                self.object_schema(&merged)
            }
            other => Err(SchemaError::NotASchema {
                keyword: keyword.to_string(),
                found: json_type(other).to_string(),
            }),
        }
    }

    fn node(&mut self, map: &JsonMap<String, Json>) -> Result<Node, SchemaError> {
        let enumeration = match map.get("enum") {
            None => None,
            Some(Json::Array(members)) => Some(members.iter().map(Value::from).collect()),
            Some(_) => return Err(SchemaError::invalid("enum", "expected an array")),
        };
        Ok(Node {
            unsupported: UNSUPPORTED_KEYWORDS
                .iter()
                .find(|keyword| map.contains_key(**keyword))
                .map(|keyword| keyword.to_string()),
            types: map.get("type").map(type_set).transpose()?,
            constant: map.get("const").map(Value::from),
            enumeration,
            conditional: self.conditional(map)?,
            object: self.object_rules(map)?,
            array: self.array_rules(map)?,
            string: string_rules(map)?,
            number: number_rules(map)?,
        })
    }

    fn optional_schema(
        &mut self,
        map: &JsonMap<String, Json>,
        keyword: &str,
    ) -> Result<Option<Schema>, SchemaError> {
        map.get(keyword)
            .map(|raw| self.schema(keyword, raw))
            .transpose()
    }

    fn conditional(&mut self, map: &JsonMap<String, Json>) -> Result<Conditional, SchemaError> {
        let required = string_list(map, "required")?.unwrap_or_default();

        let mut dependent_required = Vec::new();
        if let Some(raw) = map.get("dependentRequired") {
            let deps = raw
                .as_object()
                .ok_or_else(|| SchemaError::invalid("dependentRequired", "expected an object"))?;
            for (key, names) in deps {
                dependent_required.push((key.clone(), strings("dependentRequired", names)?));
            }
        }

        let mut dependent_schemas = Vec::new();
        if let Some(raw) = map.get("dependentSchemas") {
            let deps = raw
                .as_object()
                .ok_or_else(|| SchemaError::invalid("dependentSchemas", "expected an object"))?;
            for (key, sub) in deps {
                dependent_schemas.push((key.clone(), self.schema("dependentSchemas", sub)?));
            }
        }

        let if_then_else = match self.optional_schema(map, "if")? {
            Some(condition) => Some(IfThenElse {
                condition,
                then: self.optional_schema(map, "then")?,
                otherwise: self.optional_schema(map, "else")?,
            }),
            None => None,
        };

        Ok(Conditional {
            required,
            dependent_required,
            dependent_schemas,
            if_then_else,
        })
    }

    fn object_rules(&mut self, map: &JsonMap<String, Json>) -> Result<ObjectRules, SchemaError> {
        let mut properties = Vec::new();
        if let Some(raw) = map.get("properties") {
            let declared = raw
                .as_object()
                .ok_or_else(|| SchemaError::invalid("properties", "expected an object"))?;
            for (name, sub) in declared {
                properties.push((name.clone(), self.schema("properties", sub)?));
            }
        }

        let mut pattern_properties = Vec::new();
        if let Some(raw) = map.get("patternProperties") {
            let declared = raw
                .as_object()
                .ok_or_else(|| SchemaError::invalid("patternProperties", "expected an object"))?;
            for (pattern, sub) in declared {
                let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
                    keyword: "patternProperties".to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                pattern_properties.push((regex, self.schema("patternProperties", sub)?));
            }
        }

        Ok(ObjectRules {
            min_properties: non_negative(map, "minProperties")?,
            max_properties: non_negative(map, "maxProperties")?,
            properties,
            pattern_properties,
            additional_properties: self.optional_schema(map, "additionalProperties")?,
        })
    }

    fn array_rules(&mut self, map: &JsonMap<String, Json>) -> Result<ArrayRules, SchemaError> {
        let prefix_items = match map.get("prefixItems") {
            None => None,
            Some(Json::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| self.schema("prefixItems", item))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(_) => {
                return Err(SchemaError::invalid(
                    "prefixItems",
                    "expected an array of schemas",
                ))
            }
        };

        let unique_items = match map.get("uniqueItems") {
            None => false,
            Some(Json::Bool(b)) => *b,
            Some(_) => return Err(SchemaError::invalid("uniqueItems", "expected a boolean")),
        };

        Ok(ArrayRules {
            min_items: non_negative(map, "minItems")?,
            max_items: non_negative(map, "maxItems")?,
            prefix_items,
            items: self.optional_schema(map, "items")?,
            contains: self.optional_schema(map, "contains")?,
            min_contains: non_negative(map, "minContains")?,
            max_contains: non_negative(map, "maxContains")?,
            unique_items,
        })
    }
}

fn type_set(raw: &Json) -> Result<TypeSet, SchemaError> {
    match raw {
        Json::String(name) => Ok(TypeSet::One(TypeKeyword::from_name(name))),
        Json::Array(names) => names
            .iter()
            .map(|name| {
                name.as_str()
                    .map(TypeKeyword::from_name)
                    .ok_or_else(|| SchemaError::invalid("type", "expected a list of type names"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(TypeSet::AnyOf),
        other => Ok(TypeSet::One(TypeKeyword::Unsupported(other.to_string()))),
    }
}

fn string_rules(map: &JsonMap<String, Json>) -> Result<StringRules, SchemaError> {
    let pattern = match map.get("pattern") {
        None => None,
        Some(Json::String(source)) => {
            let regex = Regex::new(&format!(r"\A(?:{source})\z")).map_err(|e| {
                SchemaError::InvalidPattern {
                    keyword: "pattern".to_string(),
                    pattern: source.clone(),
                    reason: e.to_string(),
                }
            })?;
            Some(FullMatch {
                source: source.clone(),
                regex,
            })
        }
        Some(_) => return Err(SchemaError::invalid("pattern", "expected a string")),
    };

    let format = match map.get("format") {
        None => None,
        Some(Json::String(symbol)) => Some(symbol.clone()),
        Some(_) => return Err(SchemaError::invalid("format", "expected a string")),
    };

    Ok(StringRules {
        min_length: non_negative(map, "minLength")?,
        max_length: non_negative(map, "maxLength")?,
        pattern,
        format,
    })
}

fn number_rules(map: &JsonMap<String, Json>) -> Result<NumberRules, SchemaError> {
    let multiple_of = match map.get("multipleOf") {
        None => None,
        Some(Json::Number(n)) if n.as_f64().is_some_and(|f| f > 0.0) => Some(n.clone()),
        Some(_) => {
            return Err(SchemaError::invalid(
                "multipleOf",
                "expected a number greater than zero",
            ))
        }
    };

    Ok(NumberRules {
        minimum: number(map, "minimum")?,
        exclusive_minimum: number(map, "exclusiveMinimum")?,
        maximum: number(map, "maximum")?,
        exclusive_maximum: number(map, "exclusiveMaximum")?,
        multiple_of,
    })
}

fn non_negative(map: &JsonMap<String, Json>, keyword: &str) -> Result<Option<usize>, SchemaError> {
    let Some(raw) = map.get(keyword) else {
        return Ok(None);
    };
    let count = match raw {
        Json::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    };
    count
        .and_then(|c| usize::try_from(c).ok())
        .map(Some)
        .ok_or_else(|| SchemaError::invalid(keyword, "expected a non-negative integer"))
}

fn number(map: &JsonMap<String, Json>, keyword: &str) -> Result<Option<f64>, SchemaError> {
    map.get(keyword)
        .map(|raw| {
            raw.as_f64()
                .ok_or_else(|| SchemaError::invalid(keyword, "expected a number"))
        })
        .transpose()
}

fn string_list(
    map: &JsonMap<String, Json>,
    keyword: &str,
) -> Result<Option<Vec<String>>, SchemaError> {
    map.get(keyword).map(|raw| strings(keyword, raw)).transpose()
}

fn strings(keyword: &str, raw: &Json) -> Result<Vec<String>, SchemaError> {
    raw.as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| SchemaError::invalid(keyword, "expected an array of strings"))
}

fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
