// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nn.Sequential` container composing the rendered child layers.

use tensorify_core::{HandleDataType, PluginType, TensorifyError};
use tensorify_plugin::{
    active_variable, EmittedVariable, PluginDefinition, PluginManifest, SettingsField,
    TranslationContext, ValidatedSettings,
};

use super::{base_manifest, nn_import};
use crate::python::{bind, PyCall};

pub const EMIT_SWITCH: &str = "emitModelVar";

pub fn manifest() -> PluginManifest {
    let mut manifest = base_manifest(
        "sequential",
        "Chains nested layers into a single model",
        PluginType::Model,
        "Sequential",
        "boxes",
    );
    manifest.visual.container_type = tensorify_plugin::ContainerType::Box;
    manifest.output_handles[0].data_type = HandleDataType::Model;
    manifest.settings_fields = vec![SettingsField::toggle(EMIT_SWITCH, "Emit model variable", true)];
    manifest.emits.variables = vec![EmittedVariable::new("model", EMIT_SWITCH, HandleDataType::Model)];
    manifest.emits.imports = vec![nn_import()];
    manifest
}

fn translate(
    manifest: &PluginManifest,
    settings: &ValidatedSettings,
    ctx: &TranslationContext,
) -> Result<String, TensorifyError> {
    let call = ctx
        .children
        .iter()
        .map(|child| child.trim_end())
        .filter(|child| !child.is_empty())
        .fold(PyCall::new("nn.Sequential"), |call, child| call.arg(child));

    Ok(bind(
        active_variable(manifest, settings, EMIT_SWITCH),
        call.render(),
    ))
}

pub fn plugin() -> PluginDefinition {
    PluginDefinition::new(manifest(), translate)
}
