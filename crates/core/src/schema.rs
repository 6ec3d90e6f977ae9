// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema validation for session documents.
//!
//! The schema is embedded at compile time and compiled once. Every load,
//! save, and in-memory mutation validates against it; a document that
//! does not match is rejected, never coerced.

use jsonschema::{Draft, Validator};
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Embedded document schema (Draft 2020-12).
pub const TALK_SCHEMA: &str = include_str!("talk.schema.json");

/// Errors from schema validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("document does not match schema:\n- {}", .0.join("\n- "))]
    Invalid(Vec<String>),
    #[error("schema failed to compile: {0}")]
    Compile(String),
}

fn validator() -> Result<&'static Validator, SchemaError> {
    static VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();
    let compiled = VALIDATOR.get_or_init(|| {
        let schema: Value = serde_json::from_str(TALK_SCHEMA).map_err(|e| e.to_string())?;
        jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&schema)
            .map_err(|e| e.to_string())
    });
    match compiled {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::Compile(e.clone())),
    }
}

/// Validate a serialized document, collecting every violation.
pub fn validate(doc: &Value) -> Result<(), SchemaError> {
    let messages: Vec<String> = validator()?
        .iter_errors(doc)
        .map(|err| err.to_string())
        .collect();
    if messages.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Invalid(messages))
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
