// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry for code-generating plugins.
//!
//! The `PluginRegistry` stores `PluginEntry` records keyed by slug. Each
//! entry holds a shared plugin handle and a status. Lookups with a `latest`
//! slug resolve to the highest registered version of that package.

use std::collections::HashMap;
use std::sync::Arc;

use semver::Version;
use tensorify_core::{PluginSlug, PluginType, SlugVersion, TensorifyError};

use crate::definition::TensorifyPlugin;

/// Status of a plugin in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStatus {
    /// Plugin can be resolved and rendered.
    Enabled,
    /// Plugin is registered but hidden from resolution.
    Disabled,
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginStatus::Enabled => write!(f, "enabled"),
            PluginStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// A single entry in the plugin registry.
#[derive(Clone)]
pub struct PluginEntry {
    pub slug: PluginSlug,
    pub plugin: Arc<dyn TensorifyPlugin>,
    pub status: PluginStatus,
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginEntry")
            .field("slug", &self.slug.to_string())
            .field("status", &self.status)
            .finish()
    }
}

/// Registry of plugins keyed by `@namespace/name:version`.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    entries: HashMap<String, PluginEntry>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin with default status `Enabled`.
    pub fn register(&mut self, plugin: Arc<dyn TensorifyPlugin>) -> Result<(), TensorifyError> {
        self.register_with_status(plugin, PluginStatus::Enabled)
    }

    /// Register a plugin with an explicit status. A plugin already
    /// registered under the same slug is replaced.
    pub fn register_with_status(
        &mut self,
        plugin: Arc<dyn TensorifyPlugin>,
        status: PluginStatus,
    ) -> Result<(), TensorifyError> {
        let slug = plugin.manifest().plugin_slug()?;
        self.entries.insert(
            slug.to_string(),
            PluginEntry {
                slug,
                plugin,
                status,
            },
        );
        Ok(())
    }

    /// Get an entry by exact slug, whatever its status.
    pub fn get(&self, slug: &str) -> Option<&PluginEntry> {
        self.entries.get(slug)
    }

    /// Resolve an enabled plugin. Accepts exact slugs and `@ns/name:latest`.
    pub fn resolve(&self, slug: &str) -> Result<Arc<dyn TensorifyPlugin>, TensorifyError> {
        let parsed = PluginSlug::parse_tool(slug)?;
        let not_found = || TensorifyError::PluginNotFound {
            slug: slug.to_string(),
        };

        let entry = match parsed.version() {
            SlugVersion::Exact(_) => self.entries.get(&parsed.to_string()),
            SlugVersion::Latest => {
                let package = parsed.package_name();
                self.entries
                    .values()
                    .filter(|e| e.status == PluginStatus::Enabled && e.slug.package_name() == package)
                    .filter_map(|e| Some((entry_version(e)?, e)))
                    .max_by(|(a, _), (b, _)| a.cmp(b))
                    .map(|(_, e)| e)
            }
        };

        entry
            .filter(|e| e.status == PluginStatus::Enabled)
            .map(|e| Arc::clone(&e.plugin))
            .ok_or_else(not_found)
    }

    /// All enabled plugins of the given type, sorted by slug.
    pub fn by_plugin_type(&self, plugin_type: PluginType) -> Vec<&PluginEntry> {
        let mut entries: Vec<&PluginEntry> = self
            .entries
            .values()
            .filter(|e| {
                e.status == PluginStatus::Enabled && e.plugin.manifest().plugin_type == plugin_type
            })
            .collect();
        entries.sort_by(|a, b| a.slug.to_string().cmp(&b.slug.to_string()));
        entries
    }

    /// List all plugin entries, sorted by slug.
    pub fn list_all(&self) -> Vec<&PluginEntry> {
        let mut entries: Vec<&PluginEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.slug.to_string().cmp(&b.slug.to_string()));
        entries
    }

    /// Toggle a plugin's enabled status.
    pub fn set_enabled(&mut self, slug: &str, enabled: bool) -> Result<(), TensorifyError> {
        let entry = self
            .entries
            .get_mut(slug)
            .ok_or_else(|| TensorifyError::PluginNotFound {
                slug: slug.to_string(),
            })?;
        entry.status = if enabled {
            PluginStatus::Enabled
        } else {
            PluginStatus::Disabled
        };
        Ok(())
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry_version(entry: &PluginEntry) -> Option<Version> {
    match entry.slug.version() {
        SlugVersion::Exact(v) => Version::parse(v).ok(),
        SlugVersion::Latest => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TranslationContext;
    use crate::definition::PluginDefinition;
    use crate::manifest::PluginManifest;
    use crate::settings::ValidatedSettings;
    use serde_json::json;

    fn plugin(name: &str, version: &str, plugin_type: &str) -> Arc<dyn TensorifyPlugin> {
        let manifest: PluginManifest = serde_json::from_value(json!({
            "name": name,
            "version": version,
            "slug": format!("{name}:{version}"),
            "pluginType": plugin_type
        }))
        .unwrap();
        fn render(
            m: &PluginManifest,
            _: &ValidatedSettings,
            _: &TranslationContext,
        ) -> Result<String, TensorifyError> {
            Ok(m.slug.clone())
        }
        Arc::new(PluginDefinition::new(manifest, render))
    }

    #[test]
    fn register_and_get_roundtrip() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("@acme/linear", "1.0.0", "model_layer")).unwrap();

        let entry = registry.get("@acme/linear:1.0.0").unwrap();
        assert_eq!(entry.slug.name(), "linear");
        assert_eq!(entry.status, PluginStatus::Enabled);
    }

    #[test]
    fn register_rejects_malformed_slug() {
        let mut registry = PluginRegistry::new();
        let err = registry.register(plugin("acme/linear", "1.0.0", "model_layer")).unwrap_err();
        assert!(matches!(err, TensorifyError::InvalidSlug { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn latest_resolves_to_highest_semver() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("@acme/linear", "1.2.0", "model_layer")).unwrap();
        registry.register(plugin("@acme/linear", "1.10.0", "model_layer")).unwrap();
        registry.register(plugin("@acme/linear", "1.9.3", "model_layer")).unwrap();
        registry.register(plugin("@acme/other", "9.0.0", "model_layer")).unwrap();

        let resolved = registry.resolve("@acme/linear:latest").unwrap();
        assert_eq!(resolved.manifest().version, "1.10.0");
    }

    #[test]
    fn latest_skips_disabled_versions() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("@acme/linear", "1.0.0", "model_layer")).unwrap();
        registry
            .register_with_status(plugin("@acme/linear", "2.0.0", "model_layer"), PluginStatus::Disabled)
            .unwrap();
        let resolved = registry.resolve("@acme/linear:latest").unwrap();
        assert_eq!(resolved.manifest().version, "1.0.0");
    }

    #[test]
    fn resolve_reports_missing_and_disabled_plugins() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("@acme/linear", "1.0.0", "model_layer")).unwrap();

        assert!(matches!(
            registry.resolve("@acme/linear:2.0.0"),
            Err(TensorifyError::PluginNotFound { .. })
        ));
        assert!(matches!(
            registry.resolve("@acme/missing:latest"),
            Err(TensorifyError::PluginNotFound { .. })
        ));
        assert!(matches!(
            registry.resolve("not-a-slug"),
            Err(TensorifyError::InvalidSlug { .. })
        ));

        registry.set_enabled("@acme/linear:1.0.0", false).unwrap();
        assert!(registry.resolve("@acme/linear:1.0.0").is_err());
    }

    #[test]
    fn by_plugin_type_filters_by_type_and_status() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("@acme/linear", "1.0.0", "model_layer")).unwrap();
        registry.register(plugin("@acme/adam", "1.0.0", "optimizer")).unwrap();
        registry
            .register_with_status(plugin("@acme/conv", "1.0.0", "model_layer"), PluginStatus::Disabled)
            .unwrap();

        let layers = registry.by_plugin_type(PluginType::ModelLayer);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].slug.to_string(), "@acme/linear:1.0.0");
    }

    #[test]
    fn set_enabled_toggles_status() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("@acme/linear", "1.0.0", "model_layer")).unwrap();

        registry.set_enabled("@acme/linear:1.0.0", false).unwrap();
        assert_eq!(registry.get("@acme/linear:1.0.0").unwrap().status, PluginStatus::Disabled);

        registry.set_enabled("@acme/linear:1.0.0", true).unwrap();
        assert_eq!(registry.get("@acme/linear:1.0.0").unwrap().status, PluginStatus::Enabled);
    }

    #[test]
    fn set_enabled_returns_error_for_unknown_plugin() {
        let mut registry = PluginRegistry::new();
        assert!(registry.set_enabled("@acme/nope:1.0.0", true).is_err());
    }

    #[test]
    fn list_all_returns_sorted() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("@acme/zebra", "1.0.0", "function")).unwrap();
        registry.register(plugin("@acme/alpha", "1.0.0", "function")).unwrap();
        registry.register(plugin("@acme/middle", "1.0.0", "function")).unwrap();

        let all: Vec<String> = registry.list_all().iter().map(|e| e.slug.to_string()).collect();
        assert_eq!(all, ["@acme/alpha:1.0.0", "@acme/middle:1.0.0", "@acme/zebra:1.0.0"]);
        assert_eq!(registry.len(), 3);
    }
}
