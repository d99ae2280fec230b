// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `torch.utils.data.DataLoader` over an upstream dataset.

use serde_json::json;

use tensorify_core::{HandleDataType, HandlePosition, PluginType, TensorifyError};
use tensorify_plugin::{
    active_variable, EmittedVariable, InputHandle, OutputHandle, PluginDefinition, PluginManifest,
    SettingsField, TranslationContext, ValidatedSettings,
};

use super::{base_manifest, setting, torch_import};
use crate::python::{bind, PyCall};

pub const EMIT_SWITCH: &str = "emitDataloaderVar";

pub fn manifest() -> PluginManifest {
    let mut manifest = base_manifest(
        "dataloader",
        "Wraps a dataset in a batching, shuffling DataLoader",
        PluginType::Dataloader,
        "DataLoader",
        "package-open",
    );
    manifest.input_handles = vec![
        InputHandle::new("dataset", HandlePosition::Left, HandleDataType::Dataset)
            .required()
            .labelled("Dataset"),
    ];
    manifest.output_handles = vec![
        OutputHandle::new("dataloader", HandlePosition::Right, HandleDataType::Dataloader)
            .labelled("DataLoader"),
    ];
    manifest.settings_fields = vec![
        SettingsField::number("batch_size", "Batch size", 32)
            .with_range(Some(1.0), Some(4096.0))
            .whole()
            .required(),
        SettingsField::toggle("shuffle", "Shuffle", true),
        SettingsField::number("num_workers", "Workers", 0)
            .with_range(Some(0.0), Some(32.0))
            .whole(),
        SettingsField::toggle("drop_last", "Drop last batch", false),
        SettingsField::toggle("pin_memory", "Pin memory", false),
        SettingsField::toggle(EMIT_SWITCH, "Emit dataloader variable", true),
    ];
    manifest.emits.variables = vec![EmittedVariable::new(
        "dataloader",
        EMIT_SWITCH,
        HandleDataType::Dataloader,
    )];
    manifest.emits.imports = vec![torch_import()];
    manifest
}

fn translate(
    manifest: &PluginManifest,
    settings: &ValidatedSettings,
    ctx: &TranslationContext,
) -> Result<String, TensorifyError> {
    let call = PyCall::new("torch.utils.data.DataLoader")
        .kwarg("dataset", ctx.variable_or("dataset", "dataset"))
        .kwarg_value("batch_size", &setting(settings, "batch_size"))
        .kwarg_unless_default("shuffle", &setting(settings, "shuffle"), &json!(false))
        .kwarg_unless_default("num_workers", &setting(settings, "num_workers"), &json!(0))
        .kwarg_unless_default("drop_last", &setting(settings, "drop_last"), &json!(false))
        .kwarg_unless_default("pin_memory", &setting(settings, "pin_memory"), &json!(false));

    Ok(bind(
        active_variable(manifest, settings, EMIT_SWITCH),
        call.render(),
    ))
}

pub fn plugin() -> PluginDefinition {
    PluginDefinition::new(manifest(), translate)
}
