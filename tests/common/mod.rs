//! Contracts and helpers shared by the integration tests

#![allow(dead_code)]

use jsonschema::{Draft, JSONSchema};
use schema_mapper::ContractRegistry;
use serde_json::Value;

/// Forecast model serialized with snake_case property names
pub fn weather_registry() -> ContractRegistry {
    schema_mapper::weather::weather_registry().unwrap()
}

pub fn fixture(content: &str) -> Value {
    serde_json::from_str(content).unwrap()
}

/// Compare documents including keyword order
pub fn assert_same_document(actual: &Value, expected: &Value) {
    assert_eq!(
        serde_json::to_string_pretty(actual).unwrap(),
        serde_json::to_string_pretty(expected).unwrap()
    );
}

pub fn compile(schema: &Value) -> JSONSchema {
    JSONSchema::options()
        .with_draft(Draft::Draft202012)
        .compile(schema)
        .unwrap()
}
