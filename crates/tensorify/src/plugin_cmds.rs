// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline plugin commands: `validate`, `render` and `catalog`.

use std::fmt::Write as _;
use std::path::Path;

use serde_json::{Map, Value};

use tensorify_codegen::{builtin_registry, search_catalog};
use tensorify_core::TensorifyError;
use tensorify_plugin::{normalize_ui_manifest, TranslationContext};

/// Normalizes the manifest at `path` and summarizes it.
pub fn validate(path: &Path) -> Result<String, TensorifyError> {
    let raw = read_json(path)?;
    let manifest = normalize_ui_manifest(raw)?;
    Ok(format!(
        "ok: {} ({}, {} settings field(s), {} emitted variable(s))",
        manifest.slug,
        manifest.plugin_type,
        manifest.settings_fields.len(),
        manifest.emits.variables.len()
    ))
}

#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub slug: String,
    /// JSON object text.
    pub settings: String,
    /// `handle=variable` pairs.
    pub inputs: Vec<String>,
    pub children: Vec<String>,
    pub json: bool,
}

pub fn render(request: &RenderRequest) -> Result<String, TensorifyError> {
    let settings = parse_settings(&request.settings)?;
    let mut ctx = TranslationContext::new();
    for binding in &request.inputs {
        let (handle, variable) = binding.split_once('=').ok_or_else(|| {
            TensorifyError::Config(format!("--input `{binding}` must look like handle=variable"))
        })?;
        ctx = if variable.is_empty() {
            ctx.with_unbound_input(handle)
        } else {
            ctx.with_input(handle, variable)
        };
    }
    for child in &request.children {
        ctx = ctx.with_child(child.clone());
    }

    let registry = builtin_registry()?;
    let plugin = registry.resolve(&request.slug)?;
    let artifact = plugin.generate(&settings, &ctx)?;
    if request.json {
        serde_json::to_string_pretty(&artifact)
            .map_err(|e| TensorifyError::Internal(format!("artifact serialization failed: {e}")))
    } else {
        Ok(artifact.code)
    }
}

/// One line per matching built-in: slug, type, description.
pub fn catalog(query: &str) -> String {
    let manifests = search_catalog(query);
    let width = manifests.iter().map(|m| m.slug.len()).max().unwrap_or(0);
    let mut out = String::new();
    for m in &manifests {
        let _ = writeln!(
            out,
            "{:<width$}  {:<12}  {}",
            m.slug,
            m.plugin_type.to_string(),
            m.description
        );
    }
    if manifests.is_empty() {
        let _ = writeln!(out, "no built-in plugins match `{query}`");
    }
    out
}

fn parse_settings(text: &str) -> Result<Map<String, Value>, TensorifyError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(TensorifyError::Config(format!(
            "--settings must be a JSON object, got {other}"
        ))),
        Err(e) => Err(TensorifyError::Config(format!("--settings is not valid JSON: {e}"))),
    }
}

pub(crate) fn read_json(path: &Path) -> Result<Value, TensorifyError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| {
        TensorifyError::Config(format!("{} is not valid JSON: {e}", path.display()))
    })
}
