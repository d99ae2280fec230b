// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin definitions.
//!
//! A plugin pairs a [`PluginManifest`] with a translation function. The
//! [`TensorifyPlugin`] trait owns the validate-then-render flow, so an
//! implementation only writes [`TensorifyPlugin::translate`] against settings
//! that are already known to be well typed.

use serde::Serialize;
use serde_json::{Map, Value};

use tensorify_core::{HandleDataType, TensorifyError};

use crate::context::TranslationContext;
use crate::manifest::{EmittedVariable, PluginManifest};
use crate::settings::{validate_settings, ValidatedSettings};

/// Output of a full code generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCodeArtifact {
    pub code: String,
    /// Rendered import statements the code relies on.
    pub imports: Vec<String>,
    /// Variables the code assigns, one per active emit toggle.
    pub bindings: Vec<VariableBinding>,
}

/// A variable the generated code assigns, keyed by the value kind it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableBinding {
    #[serde(rename = "type")]
    pub data_type: HandleDataType,
    pub name: String,
}

impl From<&EmittedVariable> for VariableBinding {
    /// An untyped emit can feed any handle.
    fn from(variable: &EmittedVariable) -> Self {
        Self {
            data_type: variable.data_type.unwrap_or(HandleDataType::Any),
            name: variable.value.clone(),
        }
    }
}

/// A code-generating plugin.
pub trait TensorifyPlugin: Send + Sync {
    /// The definition this plugin was constructed with.
    fn manifest(&self) -> &PluginManifest;

    /// Renders code for settings that passed validation.
    fn translate(
        &self,
        settings: &ValidatedSettings,
        ctx: &TranslationContext,
    ) -> Result<String, TensorifyError>;

    /// Validates raw settings against the manifest, then renders.
    fn get_translation_code(
        &self,
        settings: &Map<String, Value>,
        ctx: &TranslationContext,
    ) -> Result<String, TensorifyError> {
        let validated = validate_settings(&self.manifest().settings_fields, settings)?;
        self.translate(&validated, ctx)
    }

    /// Like [`get_translation_code`](Self::get_translation_code), also
    /// reporting imports and the variables the code binds.
    fn generate(
        &self,
        settings: &Map<String, Value>,
        ctx: &TranslationContext,
    ) -> Result<GeneratedCodeArtifact, TensorifyError> {
        let manifest = self.manifest();
        let validated = validate_settings(&manifest.settings_fields, settings)?;
        let code = self.translate(&validated, ctx)?;
        Ok(GeneratedCodeArtifact {
            code,
            imports: manifest.emits.imports.iter().map(|i| i.render()).collect(),
            bindings: active_bindings(manifest, &validated)
                .into_iter()
                .map(VariableBinding::from)
                .collect(),
        })
    }
}

/// Template function shape used by [`PluginDefinition`].
pub type TranslateFn =
    fn(&PluginManifest, &ValidatedSettings, &TranslationContext) -> Result<String, TensorifyError>;

/// A plugin built from a manifest and a plain template function.
pub struct PluginDefinition {
    manifest: PluginManifest,
    template: TranslateFn,
}

impl PluginDefinition {
    /// Stores `manifest` as given. Run [`crate::normalize_ui_manifest`]
    /// first when the manifest comes from outside the process.
    pub fn new(manifest: PluginManifest, template: TranslateFn) -> Self {
        Self { manifest, template }
    }
}

impl std::fmt::Debug for PluginDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDefinition")
            .field("slug", &self.manifest.slug)
            .finish_non_exhaustive()
    }
}

impl TensorifyPlugin for PluginDefinition {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    fn translate(
        &self,
        settings: &ValidatedSettings,
        ctx: &TranslationContext,
    ) -> Result<String, TensorifyError> {
        (self.template)(&self.manifest, settings, ctx)
    }
}

/// Emitted variables whose switch toggle is on.
///
/// A toggle missing from `settings` falls back to `isOnByDefault`.
pub fn active_bindings<'m>(
    manifest: &'m PluginManifest,
    settings: &ValidatedSettings,
) -> Vec<&'m EmittedVariable> {
    manifest
        .emits
        .variables
        .iter()
        .filter(|v| {
            settings
                .bool(v.switch_field_key())
                .or(v.is_on_by_default)
                .unwrap_or(false)
        })
        .collect()
}

/// Name of the variable switched by `field_key`, when its toggle is on.
pub fn active_variable<'m>(
    manifest: &'m PluginManifest,
    settings: &ValidatedSettings,
    field_key: &str,
) -> Option<&'m str> {
    active_bindings(manifest, settings)
        .into_iter()
        .find(|v| v.switch_field_key() == field_key)
        .map(|v| v.value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ImportSpec, SettingsField};
    use serde_json::json;
    use tensorify_core::PluginType;

    fn manifest() -> PluginManifest {
        let mut manifest: PluginManifest = serde_json::from_value(json!({
            "name": "@acme/echo",
            "version": "1.0.0",
            "slug": "@acme/echo:1.0.0",
            "pluginType": "function"
        }))
        .unwrap();
        manifest.settings_fields = vec![
            SettingsField::number("count", "Count", 1).with_range(Some(1.0), None),
            SettingsField::toggle("emitEcho", "Emit", true),
        ];
        manifest.emits.variables = vec![EmittedVariable::new("echo", "emitEcho", HandleDataType::Any)];
        manifest.emits.imports = vec![ImportSpec::module("torch")];
        manifest
    }

    fn render(
        _: &PluginManifest,
        settings: &ValidatedSettings,
        ctx: &TranslationContext,
    ) -> Result<String, TensorifyError> {
        let count = settings.u64("count").unwrap_or(1);
        Ok(format!("echo({}, {count})", ctx.variable_or("prev", "x")))
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn manifest_is_stored_verbatim() {
        let plugin = PluginDefinition::new(manifest(), render);
        assert_eq!(plugin.manifest(), &manifest());
        assert_eq!(plugin.manifest().plugin_type, PluginType::Function);
    }

    #[test]
    fn translation_validates_before_rendering() {
        let plugin = PluginDefinition::new(manifest(), render);
        let ctx = TranslationContext::new().with_input("prev", "h");
        assert_eq!(
            plugin.get_translation_code(&map(json!({ "count": 3 })), &ctx).unwrap(),
            "echo(h, 3)"
        );

        let err = plugin
            .get_translation_code(&map(json!({ "count": 0 })), &ctx)
            .unwrap_err();
        assert!(matches!(err, TensorifyError::InvalidSettings { .. }));
    }

    #[test]
    fn generate_reports_imports_and_active_bindings() {
        let plugin = PluginDefinition::new(manifest(), render);
        let ctx = TranslationContext::new();

        let on = plugin.generate(&Map::new(), &ctx).unwrap();
        assert_eq!(on.imports, vec!["import torch".to_string()]);
        assert_eq!(
            on.bindings,
            vec![VariableBinding {
                data_type: HandleDataType::Any,
                name: "echo".to_string()
            }]
        );
        assert_eq!(
            serde_json::to_value(&on.bindings).unwrap(),
            json!([{ "type": "any", "name": "echo" }])
        );

        let off = plugin.generate(&map(json!({ "emitEcho": false })), &ctx).unwrap();
        assert!(off.bindings.is_empty());
    }

    #[test]
    fn bindings_carry_the_emitted_type() {
        let mut manifest = manifest();
        manifest.emits.variables = vec![
            EmittedVariable::new("echo", "emitEcho", HandleDataType::Model),
            EmittedVariable {
                data_type: None,
                ..EmittedVariable::new("untyped", "emitEcho", HandleDataType::Any)
            },
        ];
        let artifact = PluginDefinition::new(manifest, render)
            .generate(&Map::new(), &TranslationContext::new())
            .unwrap();
        let types: Vec<(HandleDataType, &str)> = artifact
            .bindings
            .iter()
            .map(|b| (b.data_type, b.name.as_str()))
            .collect();
        assert_eq!(types, vec![(HandleDataType::Model, "echo"), (HandleDataType::Any, "untyped")]);
    }

    #[test]
    fn active_variable_follows_toggle() {
        let manifest = manifest();
        let on = validate_settings(&manifest.settings_fields, &Map::new()).unwrap();
        assert_eq!(active_variable(&manifest, &on, "emitEcho"), Some("echo"));

        let off = validate_settings(&manifest.settings_fields, &map(json!({ "emitEcho": false }))).unwrap();
        assert_eq!(active_variable(&manifest, &off, "emitEcho"), None);
        assert_eq!(active_variable(&manifest, &on, "other"), None);
    }
}
