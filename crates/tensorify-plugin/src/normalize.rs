// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manifest normalization.
//!
//! Turns arbitrary JSON (file uploads, webhooks, API bodies) into a
//! well-formed [`PluginManifest`]. Legacy shapes are lifted into canonical
//! fields first, then the flow handles, schema and emitted variables are
//! checked in that order. Every failure rejects the whole manifest.

use std::collections::HashSet;
use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::debug;

use tensorify_core::{FieldViolation, PluginType, TensorifyError};

use crate::manifest::{PluginManifest, SettingsDataType, SettingsFieldType};
use crate::schema::schema_violations;

/// Legacy container that older editors nested UI fields under.
const LEGACY_FRONTEND: &str = "frontendConfigs";
/// Author-side overrides copied from the plugin package.
const SETTINGS_OVERRIDE: &str = "tensorifySettings";

/// Validates and coerces raw manifest JSON into a [`PluginManifest`].
pub fn normalize_ui_manifest(raw: Value) -> Result<PluginManifest, TensorifyError> {
    let Value::Object(mut obj) = raw else {
        return Err(TensorifyError::ManifestSchema {
            violations: vec![FieldViolation::new("(root)", "manifest must be a JSON object")],
        });
    };

    backfill_legacy_fields(&mut obj);

    let plugin_type = resolve_plugin_type(&obj);
    if let Some(plugin_type) = &plugin_type {
        obj.insert("pluginType".to_string(), Value::String(plugin_type.clone()));
    }
    obj.remove(LEGACY_FRONTEND);
    obj.remove(SETTINGS_OVERRIDE);
    backfill_slug(&mut obj);

    if let Some(plugin_type) = plugin_type.as_deref()
        && !is_variable_provider(plugin_type)
    {
        require_flow_handles(&obj)?;
    }

    let value = Value::Object(obj);
    let violations = schema_violations(&value)?;
    if !violations.is_empty() {
        return Err(TensorifyError::ManifestSchema { violations });
    }

    let manifest: PluginManifest =
        serde_json::from_value(value).map_err(|e| TensorifyError::ManifestSchema {
            violations: vec![FieldViolation::new("(root)", e.to_string())],
        })?;

    check_structure(&manifest)?;
    check_emitted_variables(&manifest)?;

    debug!(
        slug = %manifest.slug,
        plugin_type = %manifest.plugin_type,
        "manifest normalized"
    );
    Ok(manifest)
}

/// Copies `frontendConfigs.category` / `frontendConfigs.nodeType` into the
/// canonical top-level fields when those are missing.
fn backfill_legacy_fields(obj: &mut Map<String, Value>) {
    let Some(Value::Object(legacy)) = obj.get(LEGACY_FRONTEND).cloned() else {
        return;
    };
    for field in ["category", "nodeType"] {
        let missing = obj.get(field).is_none_or(Value::is_null);
        if missing && let Some(value) = legacy.get(field).filter(|v| !v.is_null()) {
            debug!(field, "backfilling legacy manifest field");
            obj.insert(field.to_string(), value.clone());
        }
    }
}

/// Resolves `pluginType` from, in order: the explicit settings override,
/// the legacy nested field, the top-level field.
fn resolve_plugin_type(obj: &Map<String, Value>) -> Option<String> {
    let candidates = [
        obj.get(SETTINGS_OVERRIDE).and_then(|s| s.get("pluginType")),
        obj.get(LEGACY_FRONTEND).and_then(|f| f.get("pluginType")),
        obj.get("pluginType"),
    ];
    candidates.into_iter().fold(None, |found, candidate| {
        found.or_else(|| {
            candidate
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        })
    })
}

/// Fills `slug` as `{name}:{version}` when both parts are present.
fn backfill_slug(obj: &mut Map<String, Value>) {
    if obj.get("slug").is_some_and(|s| !s.is_null()) {
        return;
    }
    let name = obj.get("name").and_then(Value::as_str);
    let version = obj.get("version").and_then(Value::as_str);
    if let (Some(name), Some(version)) = (name, version) {
        let slug = format!("{name}:{version}");
        obj.insert("slug".to_string(), Value::String(slug));
    }
}

fn is_variable_provider(plugin_type: &str) -> bool {
    PluginType::from_str(plugin_type).is_ok_and(PluginType::is_variable_provider)
}

/// Non-provider plugins must expose `prev` (left, required) and `next`
/// (right) so the editor can chain them.
fn require_flow_handles(obj: &Map<String, Value>) -> Result<(), TensorifyError> {
    let find = |list: &str, id: &str| -> Option<Map<String, Value>> {
        obj.get(list)?
            .as_array()?
            .iter()
            .filter_map(Value::as_object)
            .find(|h| h.get("id").and_then(Value::as_str) == Some(id))
            .cloned()
    };

    let prev = find("inputHandles", "prev").ok_or_else(|| TensorifyError::MissingHandle {
        direction: "input",
        handle: "prev".to_string(),
        detail: "non-provider plugins must declare an input handle `prev` positioned `left` and marked required"
            .to_string(),
    })?;
    expect_position(&prev, "input", "prev", "left")?;
    if prev.get("required").and_then(Value::as_bool) != Some(true) {
        return Err(TensorifyError::MissingHandle {
            direction: "input",
            handle: "prev".to_string(),
            detail: "handle must be marked `required: true`".to_string(),
        });
    }

    let next = find("outputHandles", "next").ok_or_else(|| TensorifyError::MissingHandle {
        direction: "output",
        handle: "next".to_string(),
        detail: "non-provider plugins must declare an output handle `next` positioned `right`"
            .to_string(),
    })?;
    expect_position(&next, "output", "next", "right")
}

fn expect_position(
    handle: &Map<String, Value>,
    direction: &'static str,
    id: &str,
    expected: &str,
) -> Result<(), TensorifyError> {
    let actual = handle.get("position").and_then(Value::as_str);
    if actual == Some(expected) {
        return Ok(());
    }
    Err(TensorifyError::MissingHandle {
        direction,
        handle: id.to_string(),
        detail: format!(
            "handle must be positioned `{expected}`, found `{}`",
            actual.unwrap_or("nothing")
        ),
    })
}

/// Cross-field checks the JSON Schema cannot express.
fn check_structure(manifest: &PluginManifest) -> Result<(), TensorifyError> {
    let mut violations = Vec::new();

    let expected_slug = format!("{}:{}", manifest.name, manifest.version);
    if manifest.slug != expected_slug {
        violations.push(FieldViolation::new(
            "/slug",
            format!("`{}` does not match name and version (`{expected_slug}`)", manifest.slug),
        ));
    }

    let mut keys = HashSet::new();
    for (i, field) in manifest.settings_fields.iter().enumerate() {
        if !keys.insert(field.key.as_str()) {
            violations.push(FieldViolation::new(
                format!("/settingsFields/{i}/key"),
                format!("duplicate settings key `{}`", field.key),
            ));
        }
    }

    for (list, ids) in [
        (
            "inputHandles",
            manifest.input_handles.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(),
        ),
        (
            "outputHandles",
            manifest.output_handles.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(),
        ),
    ] {
        let mut seen = HashSet::new();
        for (i, id) in ids.into_iter().enumerate() {
            if !seen.insert(id) {
                violations.push(FieldViolation::new(
                    format!("/{list}/{i}/id"),
                    format!("duplicate handle id `{id}`"),
                ));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(TensorifyError::ManifestSchema { violations })
    }
}

/// Every emitted variable must be switched by a required boolean toggle
/// whose default agrees with `isOnByDefault`.
fn check_emitted_variables(manifest: &PluginManifest) -> Result<(), TensorifyError> {
    for variable in &manifest.emits.variables {
        let key = variable.switch_field_key();
        let mismatch = |reason: String| TensorifyError::EmitMismatch {
            variable: variable.value.clone(),
            field: key.to_string(),
            reason,
        };

        let field = manifest
            .settings_field(key)
            .ok_or_else(|| mismatch("no settings field with this key".to_string()))?;

        if field.field_type != SettingsFieldType::Toggle {
            return Err(mismatch(format!(
                "field must use the TOGGLE widget, found {}",
                field.field_type
            )));
        }
        if field.data_type != SettingsDataType::Boolean {
            return Err(mismatch(format!(
                "field must have dataType BOOLEAN, found {}",
                field.data_type
            )));
        }
        if !field.required {
            return Err(mismatch("field must be required".to_string()));
        }
        if let Some(on) = variable.is_on_by_default
            && field.default_value != Some(Value::Bool(on))
        {
            return Err(mismatch(format!(
                "defaultValue must be {on} to match isOnByDefault"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tensorify_test_utils::fixtures;

    #[test]
    fn normalizes_a_layer_manifest() {
        let manifest = normalize_ui_manifest(fixtures::layer_manifest()).unwrap();
        assert_eq!(manifest.slug, "@acme/linear:1.0.0");
        assert_eq!(manifest.plugin_type, PluginType::ModelLayer);
        assert!(manifest.input_handle("prev").unwrap().required);
    }

    #[test]
    fn non_object_manifest_is_rejected() {
        let err = normalize_ui_manifest(json!([1, 2])).unwrap_err();
        assert!(matches!(err, TensorifyError::ManifestSchema { .. }));
    }

    #[test]
    fn missing_prev_handle_fails_for_non_providers() {
        let mut raw = fixtures::layer_manifest();
        raw["inputHandles"] = json!([]);
        let err = normalize_ui_manifest(raw).unwrap_err();
        match err {
            TensorifyError::MissingHandle { handle, direction, .. } => {
                assert_eq!(handle, "prev");
                assert_eq!(direction, "input");
            }
            other => panic!("expected MissingHandle, got {other:?}"),
        }
    }

    #[test]
    fn prev_handle_must_be_left_and_required() {
        let mut raw = fixtures::layer_manifest();
        raw["inputHandles"][0]["position"] = json!("top");
        let err = normalize_ui_manifest(raw).unwrap_err();
        assert!(err.to_string().contains("positioned `left`"));

        let mut raw = fixtures::layer_manifest();
        raw["inputHandles"][0]["required"] = json!(false);
        let err = normalize_ui_manifest(raw).unwrap_err();
        assert!(err.to_string().contains("required: true"));
    }

    #[test]
    fn next_handle_must_be_right() {
        let mut raw = fixtures::layer_manifest();
        raw["outputHandles"][0]["position"] = json!("bottom");
        let err = normalize_ui_manifest(raw).unwrap_err();
        assert!(matches!(
            err,
            TensorifyError::MissingHandle { ref handle, .. } if handle == "next"
        ));

        let mut raw = fixtures::layer_manifest();
        raw["outputHandles"] = json!([]);
        assert!(normalize_ui_manifest(raw).is_err());
    }

    #[test]
    fn providers_do_not_need_flow_handles() {
        let manifest = normalize_ui_manifest(fixtures::dataloader_manifest()).unwrap();
        assert_eq!(manifest.plugin_type, PluginType::Dataloader);
        assert!(manifest.input_handle("prev").is_none());
    }

    #[test]
    fn plugin_type_precedence_prefers_explicit_override() {
        let mut raw = fixtures::dataloader_manifest();
        raw["pluginType"] = json!("model_layer");
        raw["frontendConfigs"] = json!({ "pluginType": "dataset" });
        raw["tensorifySettings"] = json!({ "pluginType": "dataloader" });
        let manifest = normalize_ui_manifest(raw).unwrap();
        assert_eq!(manifest.plugin_type, PluginType::Dataloader);
    }

    #[test]
    fn plugin_type_falls_back_to_legacy_nested_field() {
        let mut raw = fixtures::dataloader_manifest();
        raw.as_object_mut().unwrap().remove("pluginType");
        raw["frontendConfigs"] = json!({ "pluginType": "dataloader" });
        let manifest = normalize_ui_manifest(raw).unwrap();
        assert_eq!(manifest.plugin_type, PluginType::Dataloader);
    }

    #[test]
    fn legacy_category_and_node_type_are_backfilled() {
        let mut raw = fixtures::dataloader_manifest();
        raw["frontendConfigs"] = json!({ "category": "data", "nodeType": "dataloader-node" });
        let manifest = normalize_ui_manifest(raw).unwrap();
        assert_eq!(manifest.category.as_deref(), Some("data"));
        assert_eq!(manifest.node_type.as_deref(), Some("dataloader-node"));
    }

    #[test]
    fn canonical_category_wins_over_legacy() {
        let mut raw = fixtures::dataloader_manifest();
        raw["category"] = json!("loaders");
        raw["frontendConfigs"] = json!({ "category": "data" });
        let manifest = normalize_ui_manifest(raw).unwrap();
        assert_eq!(manifest.category.as_deref(), Some("loaders"));
    }

    #[test]
    fn slug_is_backfilled_from_name_and_version() {
        let mut raw = fixtures::dataloader_manifest();
        raw.as_object_mut().unwrap().remove("slug");
        let manifest = normalize_ui_manifest(raw).unwrap();
        assert_eq!(manifest.slug, "@acme/dataloader:1.0.0");
    }

    #[test]
    fn inconsistent_slug_is_rejected() {
        let mut raw = fixtures::dataloader_manifest();
        raw["slug"] = json!("@acme/dataloader:2.0.0");
        let err = normalize_ui_manifest(raw).unwrap_err();
        assert_eq!(err.violations()[0].field, "/slug");
    }

    #[test]
    fn duplicate_settings_keys_are_rejected() {
        let mut raw = fixtures::dataloader_manifest();
        let first = raw["settingsFields"][0].clone();
        raw["settingsFields"].as_array_mut().unwrap().push(first);
        let err = normalize_ui_manifest(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate settings key"));
    }

    #[test]
    fn schema_violations_are_all_reported() {
        let mut raw = fixtures::dataloader_manifest();
        raw["version"] = json!("latest");
        raw["visual"] = json!({ "containerType": "hexagon" });
        let err = normalize_ui_manifest(raw).unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"/version"), "{fields:?}");
        assert!(fields.contains(&"/visual/containerType"), "{fields:?}");
    }

    #[test]
    fn emitted_variable_requires_matching_field() {
        let mut raw = fixtures::dataloader_manifest();
        raw["emits"]["variables"][0]["switchKey"] = json!("settingsFields.emitLoader");
        let err = normalize_ui_manifest(raw).unwrap_err();
        match err {
            TensorifyError::EmitMismatch { variable, field, reason } => {
                assert_eq!(variable, "dataloader");
                assert_eq!(field, "emitLoader");
                assert!(reason.contains("no settings field"));
            }
            other => panic!("expected EmitMismatch, got {other:?}"),
        }
    }

    #[test]
    fn emitted_variable_field_must_be_a_required_boolean_toggle() {
        let index = fixtures::field_index(&fixtures::dataloader_manifest(), "emitDataloaderVar");

        let mut raw = fixtures::dataloader_manifest();
        raw["settingsFields"][index]["type"] = json!("CHECKBOX");
        assert!(normalize_ui_manifest(raw).unwrap_err().to_string().contains("TOGGLE"));

        let mut raw = fixtures::dataloader_manifest();
        raw["settingsFields"][index]["dataType"] = json!("STRING");
        raw["settingsFields"][index]["defaultValue"] = json!("yes");
        assert!(normalize_ui_manifest(raw).unwrap_err().to_string().contains("BOOLEAN"));

        let mut raw = fixtures::dataloader_manifest();
        raw["settingsFields"][index]["required"] = json!(false);
        assert!(
            normalize_ui_manifest(raw)
                .unwrap_err()
                .to_string()
                .contains("must be required")
        );
    }

    #[test]
    fn emitted_variable_default_must_match_is_on_by_default() {
        let index = fixtures::field_index(&fixtures::dataloader_manifest(), "emitDataloaderVar");
        let mut raw = fixtures::dataloader_manifest();
        raw["settingsFields"][index]["defaultValue"] = json!(false);
        let err = normalize_ui_manifest(raw).unwrap_err();
        assert!(err.to_string().contains("isOnByDefault"));

        let mut raw = fixtures::dataloader_manifest();
        raw["settingsFields"][index]["defaultValue"] = json!(false);
        raw["emits"]["variables"][0]
            .as_object_mut()
            .unwrap()
            .remove("isOnByDefault");
        assert!(normalize_ui_manifest(raw).is_ok());
    }

    #[test]
    fn normalization_is_a_pure_function() {
        let a = normalize_ui_manifest(fixtures::dataloader_manifest()).unwrap();
        let b = normalize_ui_manifest(fixtures::dataloader_manifest()).unwrap();
        assert_eq!(a, b);
    }
}
