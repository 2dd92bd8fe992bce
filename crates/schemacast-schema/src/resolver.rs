//! # Reference Resolution
//!
//! Local `$ref` pointers (`#`, `#/$defs/node`, `#/items/0`) are resolved
//! against the raw root document once, when a validator is built. The
//! resulting pointer table maps each pointer to its compiled target.
//!
//! A pointer that cannot be navigated is not a construction error: it is
//! recorded with its reason and fails with `RefResolutionError` only if an
//! evaluation actually reaches it.

use std::collections::HashMap;
use std::sync::Arc;

use schemacast_core::{Violation, ViolationKind};
use serde_json::Value;

use crate::model::Schema;

/// Walk `pointer` through `root`.
///
/// Only fragment pointers are supported. Segments are unescaped
/// (`~1` → `/`, `~0` → `~`) and address object keys or array indices.
pub fn navigate<'a>(root: &'a Value, pointer: &str) -> Result<&'a Value, String> {
    let fragment = pointer
        .strip_prefix('#')
        .ok_or_else(|| format!("'{pointer}' is not a local reference"))?;
    if fragment.is_empty() {
        return Ok(root);
    }
    let path = fragment
        .strip_prefix('/')
        .ok_or_else(|| format!("'{pointer}' is not a JSON pointer"))?;

    let mut current = root;
    for raw_segment in path.split('/') {
        let segment = raw_segment.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Object(map) => map
                .get(&segment)
                .ok_or_else(|| format!("'{pointer}': no key '{segment}'"))?,
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .ok_or_else(|| format!("'{pointer}': no element '{segment}'"))?,
            _ => return Err(format!("'{pointer}': cannot descend into a scalar at '{segment}'")),
        };
    }
    Ok(current)
}

/// Pointer table built at construction time.
#[derive(Debug, Clone, Default)]
pub struct ReferenceResolver {
    targets: HashMap<String, Arc<Schema>>,
    unresolved: HashMap<String, String>,
}

impl ReferenceResolver {
    pub(crate) fn insert(&mut self, pointer: String, target: Arc<Schema>) {
        self.targets.insert(pointer, target);
    }

    pub(crate) fn mark_unresolved(&mut self, pointer: String, reason: String) {
        tracing::warn!(pointer = %pointer, reason = %reason, "$ref cannot be resolved");
        self.unresolved.insert(pointer, reason);
    }

    pub(crate) fn is_known(&self, pointer: &str) -> bool {
        self.targets.contains_key(pointer) || self.unresolved.contains_key(pointer)
    }

    /// Resolve a pointer to its compiled target.
    pub fn resolve(&self, pointer: &str) -> Result<&Schema, Violation> {
        if let Some(target) = self.targets.get(pointer) {
            return Ok(target);
        }
        let reason = self
            .unresolved
            .get(pointer)
            .map(String::as_str)
            .unwrap_or("pointer was never compiled");
        Err(Violation::new(
            ViolationKind::RefResolutionError,
            format!("cannot resolve $ref '{pointer}': {reason}"),
        ))
    }

    /// Number of resolved pointers.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
