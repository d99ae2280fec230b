// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative manifest schema.
//!
//! The JSON Schema in `schema/manifest.schema.json` is the single source of
//! truth for field shapes. Validation collects every violation instead of
//! stopping at the first one so plugin authors can fix a manifest in one pass.

use std::sync::LazyLock;

use serde_json::Value;
use tensorify_core::{FieldViolation, TensorifyError};

/// Raw text of the manifest JSON Schema (draft 2020-12).
pub const MANIFEST_SCHEMA: &str = include_str!("../schema/manifest.schema.json");

static MANIFEST_VALIDATOR: LazyLock<Result<jsonschema::Validator, String>> = LazyLock::new(|| {
    let schema: Value = serde_json::from_str(MANIFEST_SCHEMA).map_err(|e| e.to_string())?;
    jsonschema::validator_for(&schema).map_err(|e| e.to_string())
});

/// Returns the manifest schema as a JSON value.
pub fn manifest_schema() -> Result<Value, TensorifyError> {
    serde_json::from_str(MANIFEST_SCHEMA)
        .map_err(|e| TensorifyError::Internal(format!("manifest schema is not valid JSON: {e}")))
}

/// Validates `instance` against the manifest schema, returning every
/// violation found. An empty list means the instance conforms.
pub fn schema_violations(instance: &Value) -> Result<Vec<FieldViolation>, TensorifyError> {
    let validator = MANIFEST_VALIDATOR
        .as_ref()
        .map_err(|e| TensorifyError::Internal(format!("manifest schema failed to compile: {e}")))?;

    let mut violations: Vec<FieldViolation> = validator
        .iter_errors(instance)
        .map(|error| {
            let path = error.instance_path.to_string();
            let field = if path.is_empty() {
                "(root)".to_string()
            } else {
                path
            };
            FieldViolation::new(field, error.to_string())
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    Ok(violations)
}
