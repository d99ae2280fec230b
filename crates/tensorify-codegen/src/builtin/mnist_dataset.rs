// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! torchvision MNIST dataset.

use serde_json::json;

use tensorify_core::{HandleDataType, HandlePosition, PluginType, TensorifyError};
use tensorify_plugin::{
    active_variable, EmittedVariable, ImportSpec, OutputHandle, PluginDefinition, PluginManifest,
    SettingsField, TranslationContext, ValidatedSettings,
};

use super::{base_manifest, required_text, setting};
use crate::python::{bind, quote, PyCall};

pub const EMIT_SWITCH: &str = "emitDatasetVar";

pub fn manifest() -> PluginManifest {
    let mut manifest = base_manifest(
        "mnist-dataset",
        "Handwritten digit images from torchvision",
        PluginType::Dataset,
        "MNIST",
        "database",
    );
    manifest.output_handles = vec![
        OutputHandle::new("dataset", HandlePosition::Right, HandleDataType::Dataset)
            .labelled("Dataset"),
    ];
    manifest.settings_fields = vec![
        SettingsField::text("root", "Download directory", "./data").required(),
        SettingsField::toggle("train", "Training split", true),
        SettingsField::toggle("download", "Download if missing", true),
        SettingsField::toggle(EMIT_SWITCH, "Emit dataset variable", true),
    ];
    manifest.emits.variables = vec![EmittedVariable::new(
        "dataset",
        EMIT_SWITCH,
        HandleDataType::Dataset,
    )];
    manifest.emits.imports = vec![ImportSpec {
        items: vec!["datasets".to_string(), "transforms".to_string()],
        ..ImportSpec::module("torchvision")
    }];
    manifest
}

fn translate(
    manifest: &PluginManifest,
    settings: &ValidatedSettings,
    _ctx: &TranslationContext,
) -> Result<String, TensorifyError> {
    // Paths are always string literals, even when they look like a name.
    let root = required_text(settings, "root")?;
    let call = PyCall::new("datasets.MNIST")
        .kwarg("root", quote(root))
        .kwarg_unless_default("train", &setting(settings, "train"), &json!(true))
        .kwarg_unless_default("download", &setting(settings, "download"), &json!(false))
        .kwarg("transform", "transforms.ToTensor()");

    Ok(bind(
        active_variable(manifest, settings, EMIT_SWITCH),
        call.render(),
    ))
}

pub fn plugin() -> PluginDefinition {
    PluginDefinition::new(manifest(), translate)
}
