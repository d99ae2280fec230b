// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in plugins shipped with the engine.
//!
//! Each submodule exposes `plugin()`, returning a [`PluginDefinition`] whose
//! manifest is built in code and whose template is a pure function of the
//! validated settings and translation context.

pub mod adam_optimizer;
pub mod conv2d;
pub mod dataloader;
pub mod linear;
pub mod mnist_dataset;
pub mod sequential;
pub mod training_loop;

use serde_json::Value;

use tensorify_core::{FieldViolation, HandleDataType, HandlePosition, PluginType, TensorifyError};
use tensorify_plugin::{
    Icon, ImportSpec, InputHandle, NodeIcons, NodeLabels, OutputHandle, PluginManifest,
    ValidatedSettings, VisualConfig,
};

/// Namespace of every built-in plugin.
pub const BUILTIN_NAMESPACE: &str = "tensorify";
/// Version of every built-in plugin.
pub const BUILTIN_VERSION: &str = "1.0.0";

/// Skeleton manifest for a built-in. Non-provider types get the `prev` and
/// `next` flow handles.
pub(crate) fn base_manifest(
    name: &str,
    description: &str,
    plugin_type: PluginType,
    title: &str,
    icon: &str,
) -> PluginManifest {
    let package = format!("@{BUILTIN_NAMESPACE}/{name}");
    let (input_handles, output_handles) = if plugin_type.is_variable_provider() {
        (Vec::new(), Vec::new())
    } else {
        (
            vec![InputHandle::new("prev", HandlePosition::Left, HandleDataType::Any).required()],
            vec![OutputHandle::new("next", HandlePosition::Right, HandleDataType::Any)],
        )
    };

    PluginManifest {
        slug: format!("{package}:{BUILTIN_VERSION}"),
        name: package,
        version: BUILTIN_VERSION.to_string(),
        description: description.to_string(),
        author: Some("Tensorify Contributors".to_string()),
        plugin_type,
        category: Some(plugin_type.to_string()),
        node_type: None,
        visual: VisualConfig {
            labels: NodeLabels {
                title: title.to_string(),
                ..NodeLabels::default()
            },
            icons: NodeIcons {
                primary: Some(Icon::lucide(icon)),
                secondary: Vec::new(),
            },
            ..VisualConfig::default()
        },
        input_handles,
        output_handles,
        settings_fields: Vec::new(),
        emits: Default::default(),
    }
}

pub(crate) fn torch_import() -> ImportSpec {
    ImportSpec::module("torch")
}

pub(crate) fn nn_import() -> ImportSpec {
    ImportSpec {
        items: vec!["nn".to_string()],
        ..ImportSpec::module("torch")
    }
}

/// Setting as JSON, `Null` when absent.
pub(crate) fn setting(settings: &ValidatedSettings, key: &str) -> Value {
    settings
        .get(key)
        .map(|v| v.to_value())
        .unwrap_or(Value::Null)
}

/// A string setting the template cannot render without.
pub(crate) fn required_text<'s>(
    settings: &'s ValidatedSettings,
    key: &str,
) -> Result<&'s str, TensorifyError> {
    settings.text(key).ok_or_else(|| TensorifyError::InvalidSettings {
        violations: vec![FieldViolation::new(key, "is required")],
    })
}
