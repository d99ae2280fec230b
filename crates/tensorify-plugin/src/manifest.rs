// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest model.
//!
//! A manifest describes a plugin's identity, how its node is drawn, which
//! handles it exposes, which settings it accepts and which variables its
//! generated code binds. Field names follow the camelCase JSON shape the
//! workflow editor produces. Use [`crate::normalize_ui_manifest`] to build a
//! manifest from untrusted JSON; constructing one in code performs no
//! validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use tensorify_core::{HandleDataType, HandlePosition, PluginSlug, PluginType, TensorifyError};

/// Canonical description of a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginManifest {
    /// Package name, `@namespace/name`.
    pub name: String,
    /// `MAJOR.MINOR.PATCH`.
    pub version: String,
    /// `@namespace/name:version`.
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub plugin_type: PluginType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub input_handles: Vec<InputHandle>,
    #[serde(default)]
    pub output_handles: Vec<OutputHandle>,
    #[serde(default)]
    pub settings_fields: Vec<SettingsField>,
    #[serde(default)]
    pub emits: Emits,
}

impl PluginManifest {
    /// Parses the manifest's slug with the strict grammar.
    pub fn plugin_slug(&self) -> Result<PluginSlug, TensorifyError> {
        PluginSlug::parse(&self.slug)
    }

    pub fn input_handle(&self, id: &str) -> Option<&InputHandle> {
        self.input_handles.iter().find(|h| h.id == id)
    }

    pub fn output_handle(&self, id: &str) -> Option<&OutputHandle> {
        self.output_handles.iter().find(|h| h.id == id)
    }

    pub fn settings_field(&self, key: &str) -> Option<&SettingsField> {
        self.settings_fields.iter().find(|f| f.key == key)
    }
}

/// How the node is drawn in the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VisualConfig {
    #[serde(default)]
    pub container_type: ContainerType,
    #[serde(default)]
    pub size: NodeSize,
    #[serde(default)]
    pub icons: NodeIcons,
    #[serde(default)]
    pub labels: NodeLabels,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            container_type: ContainerType::Default,
            size: NodeSize::default(),
            icons: NodeIcons::default(),
            labels: NodeLabels::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerType {
    #[default]
    Default,
    Box,
    Circle,
    LeftRound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSize {
    pub width: u32,
    pub height: u32,
}

impl Default for NodeSize {
    fn default() -> Self {
        Self {
            width: 200,
            height: 120,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeIcons {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<Icon>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary: Vec<Icon>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Icon {
    #[serde(rename = "type")]
    pub kind: IconKind,
    pub value: String,
}

impl Icon {
    pub fn lucide(value: impl Into<String>) -> Self {
        Self {
            kind: IconKind::Lucide,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Lucide,
    Svg,
    Fontawesome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeLabels {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_label_template: Option<String>,
}

/// Incoming connection point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InputHandle {
    pub id: String,
    pub position: HandlePosition,
    #[serde(default = "any_data_type")]
    pub data_type: HandleDataType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InputHandle {
    pub fn new(id: impl Into<String>, position: HandlePosition, data_type: HandleDataType) -> Self {
        Self {
            id: id.into(),
            position,
            data_type,
            required: false,
            label: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Outgoing connection point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputHandle {
    pub id: String,
    pub position: HandlePosition,
    #[serde(default = "any_data_type")]
    pub data_type: HandleDataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OutputHandle {
    pub fn new(id: impl Into<String>, position: HandlePosition, data_type: HandleDataType) -> Self {
        Self {
            id: id.into(),
            position,
            data_type,
            label: None,
            description: None,
        }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

fn any_data_type() -> HandleDataType {
    HandleDataType::Any
}

/// UI widget used to edit a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingsFieldType {
    InputText,
    Textarea,
    InputNumber,
    Slider,
    Toggle,
    Checkbox,
    Dropdown,
    Radio,
    MultiSelect,
    CodeEditor,
}

/// JSON type a setting's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingsDataType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

/// One configurable parameter of a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: SettingsFieldType,
    pub data_type: SettingsDataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

impl SettingsField {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        field_type: SettingsFieldType,
        data_type: SettingsDataType,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            data_type,
            default_value: None,
            required: false,
            description: None,
            options: Vec::new(),
            validation: None,
        }
    }

    /// A required boolean toggle, the shape emit switches must have.
    pub fn toggle(key: impl Into<String>, label: impl Into<String>, default: bool) -> Self {
        Self::new(key, label, SettingsFieldType::Toggle, SettingsDataType::Boolean)
            .with_default(Value::Bool(default))
            .required()
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::new(key, label, SettingsFieldType::InputNumber, SettingsDataType::Number)
            .with_default(default.into())
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>, default: &str) -> Self {
        Self::new(key, label, SettingsFieldType::InputText, SettingsDataType::String)
            .with_default(Value::String(default.to_string()))
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        let validation = self.validation.get_or_insert_with(FieldValidation::default);
        validation.min = min;
        validation.max = max;
        self
    }

    /// Restricts a number field to whole values.
    pub fn whole(mut self) -> Self {
        self.validation.get_or_insert_with(FieldValidation::default).integer = true;
        self
    }

    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = values
            .into_iter()
            .map(|v| {
                let v = v.into();
                FieldOption {
                    label: v.clone(),
                    value: Value::String(v),
                }
            })
            .collect();
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One choice of a dropdown/radio/multi-select field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOption {
    pub label: String,
    pub value: Value,
}

/// Declarative bounds on a setting's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Numbers must be whole. `20.0` is accepted and stored as `20`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub integer: bool,
}

/// Variables and imports the generated code exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Emits {
    #[serde(default)]
    pub variables: Vec<EmittedVariable>,
    #[serde(default)]
    pub imports: Vec<ImportSpec>,
}

/// A variable binding gated by a boolean toggle setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmittedVariable {
    /// Variable name the generated code assigns.
    pub value: String,
    /// Path to the toggle, e.g. `settingsFields.emitDataloaderVar`.
    pub switch_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_on_by_default: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<HandleDataType>,
}

impl EmittedVariable {
    pub fn new(value: impl Into<String>, switch_field: &str, data_type: HandleDataType) -> Self {
        Self {
            value: value.into(),
            switch_key: format!("settingsFields.{switch_field}"),
            is_on_by_default: Some(true),
            data_type: Some(data_type),
        }
    }

    /// Settings field key the switch refers to: the last dot segment.
    pub fn switch_field_key(&self) -> &str {
        self.switch_key
            .rsplit('.')
            .next()
            .unwrap_or(self.switch_key.as_str())
    }
}

/// A Python import the generated snippet relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportSpec {
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ImportSpec {
    pub fn module(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            items: Vec::new(),
            alias: None,
        }
    }

    /// Renders the import as a Python statement.
    pub fn render(&self) -> String {
        if !self.items.is_empty() {
            return format!("from {} import {}", self.path, self.items.join(", "));
        }
        match &self.alias {
            Some(alias) => format!("import {} as {alias}", self.path),
            None => format!("import {}", self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_field_key_is_last_segment() {
        let var = EmittedVariable::new("dataloader", "emitDataloaderVar", HandleDataType::Dataloader);
        assert_eq!(var.switch_key, "settingsFields.emitDataloaderVar");
        assert_eq!(var.switch_field_key(), "emitDataloaderVar");

        let bare = EmittedVariable {
            switch_key: "emitModel".into(),
            ..var
        };
        assert_eq!(bare.switch_field_key(), "emitModel");
    }

    #[test]
    fn imports_render_as_python() {
        assert_eq!(ImportSpec::module("torch").render(), "import torch");
        let aliased = ImportSpec {
            alias: Some("np".into()),
            ..ImportSpec::module("numpy")
        };
        assert_eq!(aliased.render(), "import numpy as np");
        let from = ImportSpec {
            items: vec!["datasets".into(), "transforms".into()],
            ..ImportSpec::module("torchvision")
        };
        assert_eq!(from.render(), "from torchvision import datasets, transforms");
    }

    #[test]
    fn settings_field_serializes_camel_case() {
        let field = SettingsField::number("batch_size", "Batch size", 32).with_range(Some(1.0), None);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "INPUT_NUMBER");
        assert_eq!(json["dataType"], "NUMBER");
        assert_eq!(json["defaultValue"], 32);
        assert_eq!(json["validation"]["min"], 1.0);
        assert!(json.get("options").is_none());
    }

    #[test]
    fn toggle_helper_is_required_boolean() {
        let field = SettingsField::toggle("emitDataloaderVar", "Emit dataloader", true);
        assert_eq!(field.field_type, SettingsFieldType::Toggle);
        assert_eq!(field.data_type, SettingsDataType::Boolean);
        assert!(field.required);
        assert_eq!(field.default_value, Some(Value::Bool(true)));
    }

    #[test]
    fn visual_defaults_fill_missing_sections() {
        let visual: VisualConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(visual.container_type, ContainerType::Default);
        assert_eq!(visual.size, NodeSize { width: 200, height: 120 });
        assert!(visual.icons.primary.is_none());
    }
}
