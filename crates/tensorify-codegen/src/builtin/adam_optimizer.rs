// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adam optimizer over an upstream model's parameters.

use serde_json::{json, Value};

use tensorify_core::{HandleDataType, HandlePosition, PluginType, TensorifyError};
use tensorify_plugin::{
    active_variable, EmittedVariable, InputHandle, PluginDefinition, PluginManifest,
    SettingsField, TranslationContext, ValidatedSettings,
};

use super::{base_manifest, setting, torch_import};
use crate::python::{bind, same_value, tuple, PyCall};

pub const EMIT_SWITCH: &str = "emitOptimizerVar";

pub fn manifest() -> PluginManifest {
    let mut manifest = base_manifest(
        "adam-optimizer",
        "Adaptive moment estimation optimizer",
        PluginType::Optimizer,
        "Adam",
        "trending-down",
    );
    manifest.input_handles.push(
        InputHandle::new("model", HandlePosition::Top, HandleDataType::Model)
            .required()
            .labelled("Model"),
    );
    manifest.output_handles[0].data_type = HandleDataType::Optimizer;
    manifest.settings_fields = vec![
        SettingsField::number("lr", "Learning rate", 0.001)
            .with_range(Some(0.0), None)
            .required(),
        SettingsField::number("beta1", "Beta 1", 0.9).with_range(Some(0.0), Some(1.0)),
        SettingsField::number("beta2", "Beta 2", 0.999).with_range(Some(0.0), Some(1.0)),
        SettingsField::number("weight_decay", "Weight decay", 0).with_range(Some(0.0), None),
        SettingsField::toggle("amsgrad", "AMSGrad", false),
        SettingsField::toggle(EMIT_SWITCH, "Emit optimizer variable", true),
    ];
    manifest.emits.variables = vec![EmittedVariable::new(
        "optimizer",
        EMIT_SWITCH,
        HandleDataType::Optimizer,
    )];
    manifest.emits.imports = vec![torch_import()];
    manifest
}

fn translate(
    manifest: &PluginManifest,
    settings: &ValidatedSettings,
    ctx: &TranslationContext,
) -> Result<String, TensorifyError> {
    let model = ctx.variable_or("model", "model");
    let betas = [setting(settings, "beta1"), setting(settings, "beta2")];
    let default_betas = [json!(0.9), json!(0.999)];
    let betas_changed = betas
        .iter()
        .zip(&default_betas)
        .any(|(value, default)| !same_value(value, default));

    let mut call = PyCall::new("torch.optim.Adam")
        .arg(format!("{model}.parameters()"))
        .kwarg_unless_default("lr", &setting(settings, "lr"), &json!(0.001));
    if betas_changed {
        call = call.kwarg("betas", tuple(&betas));
    }
    let call = call
        .kwarg_unless_default("weight_decay", &setting(settings, "weight_decay"), &json!(0))
        .kwarg_unless_default("amsgrad", &setting(settings, "amsgrad"), &Value::Bool(false));

    Ok(bind(
        active_variable(manifest, settings, EMIT_SWITCH),
        call.render(),
    ))
}

pub fn plugin() -> PluginDefinition {
    PluginDefinition::new(manifest(), translate)
}
