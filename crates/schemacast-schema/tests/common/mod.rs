//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Once;

use schemacast_core::{Value, ViolationKind};
use schemacast_schema::{parse_and_validate, Error};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness (`RUST_LOG=debug` to see it).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Parse `raw` and evaluate it against `schema` with the built-in formats.
pub fn loads(raw: &str, schema: &serde_json::Value) -> Result<Value, Error> {
    init_tracing();
    parse_and_validate(raw, schema, &[])
}

/// The violation kind `raw` fails with. Panics if it does not fail with a violation.
pub fn violation(raw: &str, schema: &serde_json::Value) -> ViolationKind {
    match loads(raw, schema) {
        Err(Error::Violation(v)) => v.kind(),
        other => panic!("expected a violation for {raw}, got {other:?}"),
    }
}
