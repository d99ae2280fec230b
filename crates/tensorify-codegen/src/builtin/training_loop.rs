// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supervised training loop wiring a model, dataloader and optimizer.

use tensorify_core::{HandleDataType, HandlePosition, PluginType, TensorifyError};
use tensorify_plugin::{
    InputHandle, PluginDefinition, PluginManifest, SettingsDataType, SettingsField,
    SettingsFieldType, TranslationContext, ValidatedSettings,
};

use super::{base_manifest, nn_import, required_text, setting, torch_import};
use crate::python::{literal, quote, PyCall};

const LOSS_FUNCTIONS: [&str; 4] = ["CrossEntropyLoss", "MSELoss", "NLLLoss", "BCEWithLogitsLoss"];

pub fn manifest() -> PluginManifest {
    let mut manifest = base_manifest(
        "training-loop",
        "Runs epochs of forward, backward and optimizer steps",
        PluginType::Trainer,
        "Training loop",
        "repeat",
    );
    for (id, data_type, label) in [
        ("model", HandleDataType::Model, "Model"),
        ("dataloader", HandleDataType::Dataloader, "DataLoader"),
        ("optimizer", HandleDataType::Optimizer, "Optimizer"),
    ] {
        manifest.input_handles.push(
            InputHandle::new(id, HandlePosition::Top, data_type)
                .required()
                .labelled(label),
        );
    }
    manifest.settings_fields = vec![
        SettingsField::number("epochs", "Epochs", 10)
            .with_range(Some(1.0), None)
            .whole()
            .required(),
        SettingsField::new(
            "loss_function",
            "Loss function",
            SettingsFieldType::Dropdown,
            SettingsDataType::String,
        )
        .with_default("CrossEntropyLoss".into())
        .with_options(LOSS_FUNCTIONS)
        .required(),
        SettingsField::new("device", "Device", SettingsFieldType::Radio, SettingsDataType::String)
            .with_default("cpu".into())
            .with_options(["cpu", "cuda", "mps"]),
        SettingsField::number("log_interval", "Log every N batches", 100)
            .with_range(Some(1.0), None)
            .whole(),
    ];
    manifest.emits.imports = vec![torch_import(), nn_import()];
    manifest
}

fn translate(
    _manifest: &PluginManifest,
    settings: &ValidatedSettings,
    ctx: &TranslationContext,
) -> Result<String, TensorifyError> {
    let model = ctx.variable_or("model", "model");
    let dataloader = ctx.variable_or("dataloader", "dataloader");
    let optimizer = ctx.variable_or("optimizer", "optimizer");
    let epochs = literal(&setting(settings, "epochs"));
    let loss = required_text(settings, "loss_function")?;
    let device = quote(required_text(settings, "device")?);
    let log_interval = literal(&setting(settings, "log_interval"));
    let criterion = PyCall::new(format!("nn.{loss}")).render();

    Ok([
        format!("criterion = {criterion}"),
        format!("{model}.to({device})"),
        format!("for epoch in range({epochs}):"),
        format!("    {model}.train()"),
        format!("    for batch_idx, (inputs, targets) in enumerate({dataloader}):"),
        format!("        inputs, targets = inputs.to({device}), targets.to({device})"),
        format!("        {optimizer}.zero_grad()"),
        format!("        outputs = {model}(inputs)"),
        "        loss = criterion(outputs, targets)".to_string(),
        "        loss.backward()".to_string(),
        format!("        {optimizer}.step()"),
        format!("        if batch_idx % {log_interval} == 0:"),
        "            print(f\"epoch {epoch} batch {batch_idx} loss {loss.item():.4f}\")".to_string(),
    ]
    .join("\n"))
}

pub fn plugin() -> PluginDefinition {
    PluginDefinition::new(manifest(), translate)
}
