//! # Format Registry
//!
//! A *format* is a named string-encoding convention (the `format` keyword
//! of a string schema) with a decode half, turning the raw string into a
//! semantic [`Value`], and an encode half for the reverse direction.
//!
//! [`FormatRegistry`] maps symbols to formats. It is built once, owned by
//! the validator that uses it, and never mutated afterwards; callers extend
//! it at construction with [`FormatRegistry::with_formats`]. A caller format
//! whose symbol collides with a built-in replaces the built-in: that is the
//! only way a built-in is shadowed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::builtin;
use crate::error::FormatError;
use crate::value::Value;

/// A string format with decode and encode halves.
///
/// Implementations must be `Send + Sync`: a registry is shared by every
/// evaluation a validator runs.
pub trait Format: Send + Sync + fmt::Debug {
    /// The symbol used in the schema's `format` keyword.
    fn symbol(&self) -> &str;

    /// Decode a raw string into a semantic value.
    fn decode(&self, raw: &str) -> Result<Value, FormatError>;

    /// Encode a decoded value back into its string form.
    fn encode(&self, value: &Value) -> Result<String, FormatError>;
}

/// Symbol → format mapping consulted by string schemas.
#[derive(Clone)]
pub struct FormatRegistry {
    formats: HashMap<String, Arc<dyn Format>>,
}

impl FormatRegistry {
    /// An empty registry with no formats at all.
    pub fn empty() -> Self {
        Self {
            formats: HashMap::new(),
        }
    }

    /// A registry seeded with the built-in formats.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for format in builtin::all() {
            registry.insert(format);
        }
        registry
    }

    /// The built-in registry extended with caller formats. Caller formats
    /// override built-ins sharing the same symbol.
    pub fn with_formats(extra: impl IntoIterator<Item = Arc<dyn Format>>) -> Self {
        let mut registry = Self::builtin();
        for format in extra {
            if registry.contains(format.symbol()) {
                tracing::debug!(symbol = format.symbol(), "caller format overrides built-in");
            }
            registry.insert(format);
        }
        registry
    }

    fn insert(&mut self, format: Arc<dyn Format>) {
        self.formats.insert(format.symbol().to_string(), format);
    }

    /// Look up a format by symbol.
    pub fn get(&self, symbol: &str) -> Option<&Arc<dyn Format>> {
        self.formats.get(symbol)
    }

    /// True if `symbol` is registered.
    pub fn contains(&self, symbol: &str) -> bool {
        self.formats.contains_key(symbol)
    }

    /// Registered symbols, sorted alphabetically.
    pub fn symbols(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formats.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Number of registered formats.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// True if no formats are registered.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("symbols", &self.symbols())
            .finish()
    }
}
