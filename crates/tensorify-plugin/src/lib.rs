// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifests, settings validation and the plugin registry.
//!
//! Manifests from outside the process go through [`normalize_ui_manifest`].
//! Plugins implement [`TensorifyPlugin`]; raw settings are validated into
//! [`ValidatedSettings`] before any template sees them.

pub mod context;
pub mod definition;
pub mod manifest;
pub mod normalize;
pub mod registry;
pub mod schema;
pub mod settings;

pub use context::TranslationContext;
pub use definition::{
    active_bindings, active_variable, GeneratedCodeArtifact, PluginDefinition, TensorifyPlugin,
    TranslateFn, VariableBinding,
};
pub use manifest::{
    ContainerType, EmittedVariable, Emits, FieldOption, FieldValidation, Icon, IconKind,
    ImportSpec, InputHandle, NodeIcons, NodeLabels, NodeSize, OutputHandle, PluginManifest,
    SettingsDataType, SettingsField, SettingsFieldType, VisualConfig,
};
pub use normalize::normalize_ui_manifest;
pub use registry::{PluginEntry, PluginRegistry, PluginStatus};
pub use schema::{manifest_schema, schema_violations, MANIFEST_SCHEMA};
pub use settings::{validate_settings, SettingValue, ValidatedSettings};
