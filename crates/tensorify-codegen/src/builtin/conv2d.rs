// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! 2D convolution layer.

use serde_json::json;

use tensorify_core::{PluginType, TensorifyError};
use tensorify_plugin::{
    PluginDefinition, PluginManifest, SettingsField, TranslationContext, ValidatedSettings,
};

use super::linear::features_field;
use super::{base_manifest, nn_import, setting};
use crate::python::PyCall;

pub fn manifest() -> PluginManifest {
    let mut manifest = base_manifest(
        "conv2d",
        "Applies a 2D convolution over an input signal of several planes",
        PluginType::ModelLayer,
        "Conv2d",
        "grid-3x3",
    );
    manifest.settings_fields = vec![
        features_field("in_channels", "In channels"),
        features_field("out_channels", "Out channels"),
        SettingsField::number("kernel_size", "Kernel size", 3)
            .with_range(Some(1.0), None)
            .whole()
            .required(),
        SettingsField::number("stride", "Stride", 1)
            .with_range(Some(1.0), None)
            .whole(),
        SettingsField::number("padding", "Padding", 0)
            .with_range(Some(0.0), None)
            .whole(),
        SettingsField::toggle("bias", "Learn bias", true),
    ];
    manifest.emits.imports = vec![nn_import()];
    manifest
}

fn translate(
    _manifest: &PluginManifest,
    settings: &ValidatedSettings,
    _ctx: &TranslationContext,
) -> Result<String, TensorifyError> {
    Ok(PyCall::new("nn.Conv2d")
        .kwarg_value("in_channels", &setting(settings, "in_channels"))
        .kwarg_value("out_channels", &setting(settings, "out_channels"))
        .kwarg_value("kernel_size", &setting(settings, "kernel_size"))
        .kwarg_unless_default("stride", &setting(settings, "stride"), &json!(1))
        .kwarg_unless_default("padding", &setting(settings, "padding"), &json!(0))
        .kwarg_unless_default("bias", &setting(settings, "bias"), &json!(true))
        .render())
}

pub fn plugin() -> PluginDefinition {
    PluginDefinition::new(manifest(), translate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensorify_plugin::TensorifyPlugin;

    #[test]
    fn renders_with_library_defaults_omitted() {
        let raw = json!({ "in_channels": 1, "out_channels": 32 });
        let code = plugin()
            .get_translation_code(raw.as_object().unwrap(), &TranslationContext::new())
            .unwrap();
        assert_eq!(
            code,
            "nn.Conv2d(\n    in_channels=1,\n    out_channels=32,\n    kernel_size=3\n)"
        );
    }

    #[test]
    fn renders_stride_and_padding_when_set() {
        let raw = json!({ "in_channels": 3, "out_channels": 8, "kernel_size": 5, "stride": 2, "padding": 2 });
        let code = plugin()
            .get_translation_code(raw.as_object().unwrap(), &TranslationContext::new())
            .unwrap();
        assert!(code.contains("    stride=2,\n    padding=2\n)"));
    }
}
