// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fully connected `nn.Linear` layer.

use serde_json::json;

use tensorify_core::{PluginType, TensorifyError};
use tensorify_plugin::{
    PluginDefinition, PluginManifest, SettingsDataType, SettingsField, SettingsFieldType,
    TranslationContext, ValidatedSettings,
};

use super::{base_manifest, nn_import, setting};
use crate::python::PyCall;

pub fn manifest() -> PluginManifest {
    let mut manifest = base_manifest(
        "linear",
        "Applies an affine transformation to the incoming features",
        PluginType::ModelLayer,
        "Linear",
        "git-commit-horizontal",
    );
    manifest.settings_fields = vec![
        features_field("in_features", "In features"),
        features_field("out_features", "Out features"),
        SettingsField::toggle("bias", "Learn bias", true),
    ];
    manifest.emits.imports = vec![nn_import()];
    manifest
}

pub(crate) fn features_field(key: &str, label: &str) -> SettingsField {
    SettingsField::new(key, label, SettingsFieldType::InputNumber, SettingsDataType::Number)
        .with_range(Some(1.0), None)
        .whole()
        .required()
}

fn translate(
    _manifest: &PluginManifest,
    settings: &ValidatedSettings,
    _ctx: &TranslationContext,
) -> Result<String, TensorifyError> {
    Ok(PyCall::new("nn.Linear")
        .kwarg_value("in_features", &setting(settings, "in_features"))
        .kwarg_value("out_features", &setting(settings, "out_features"))
        .kwarg_unless_default("bias", &setting(settings, "bias"), &json!(true))
        .render())
}

pub fn plugin() -> PluginDefinition {
    PluginDefinition::new(manifest(), translate)
}
