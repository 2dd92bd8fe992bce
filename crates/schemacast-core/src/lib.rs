//! # schemacast-core — Foundational Types for schemacast
//!
//! This crate defines the data that flows through schema evaluation. Every
//! other schemacast crate depends on it; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One value tree for input and output.** [`Value`] carries the six
//!    JSON variants plus the semantic types format decoders produce
//!    (`Uuid`, `DateTime`, `Duration`, `Ipv4`, `Bytes`, ...). Evaluating an
//!    already-decoded tree is therefore well-typed.
//!
//! 2. **A single failure category.** Evaluation failures are a
//!    [`Violation`] tagged with a [`ViolationKind`]; nested failures are kept
//!    as the violation's cause rather than flattened into text.
//!
//! 3. **Formats are values, not globals.** A [`FormatRegistry`] is built
//!    once, owned by whoever evaluates with it, and never mutated afterwards.
//!    Caller formats are merged in at construction time.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `schemacast-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests; constant regexes are the
//!   only `.expect()` calls.

pub mod builtin;
pub mod duration;
pub mod encode;
pub mod error;
pub mod format;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use duration::IsoDuration;
pub use error::{Cause, DurationError, FormatError, Violation, ViolationKind};
pub use format::{Format, FormatRegistry};
pub use value::{Map, Opaque, TimeOfDay, Value};
