// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in plugin catalog.
//!
//! Returns the plugins compiled into the engine. No network calls are made.

use std::sync::Arc;

use tensorify_core::TensorifyError;
use tracing::debug;
use tensorify_plugin::{PluginManifest, PluginRegistry, TensorifyPlugin};

use crate::builtin;

/// Returns every built-in plugin:
/// - mnist-dataset (dataset)
/// - dataloader (dataloader)
/// - linear, conv2d (model_layer)
/// - sequential (model)
/// - adam-optimizer (optimizer)
/// - training-loop (trainer)
pub fn builtin_plugins() -> Vec<Arc<dyn TensorifyPlugin>> {
    vec![
        Arc::new(builtin::mnist_dataset::plugin()),
        Arc::new(builtin::dataloader::plugin()),
        Arc::new(builtin::linear::plugin()),
        Arc::new(builtin::conv2d::plugin()),
        Arc::new(builtin::sequential::plugin()),
        Arc::new(builtin::adam_optimizer::plugin()),
        Arc::new(builtin::training_loop::plugin()),
    ]
}

/// Returns manifests for all built-in plugins.
pub fn builtin_catalog() -> Vec<PluginManifest> {
    builtin_plugins()
        .iter()
        .map(|p| p.manifest().clone())
        .collect()
}

/// Search the built-in catalog by query string.
///
/// Filters entries whose name or description contains the query (case-insensitive).
/// If query is empty, returns all entries.
pub fn search_catalog(query: &str) -> Vec<PluginManifest> {
    if query.is_empty() {
        return builtin_catalog();
    }
    let query_lower = query.to_lowercase();
    builtin_catalog()
        .into_iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&query_lower)
                || m.description.to_lowercase().contains(&query_lower)
        })
        .collect()
}

/// Builds a registry holding every built-in plugin, all enabled.
pub fn builtin_registry() -> Result<PluginRegistry, TensorifyError> {
    let mut registry = PluginRegistry::new();
    for plugin in builtin_plugins() {
        registry.register(plugin)?;
    }
    debug!(count = registry.len(), "built-in registry ready");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tensorify_core::PluginType;

    #[test]
    fn builtin_catalog_returns_seven_entries() {
        assert_eq!(builtin_catalog().len(), 7);
    }

    #[test]
    fn builtin_slugs_are_unique() {
        let slugs: HashSet<String> = builtin_catalog().into_iter().map(|m| m.slug).collect();
        assert_eq!(slugs.len(), 7);
    }

    #[test]
    fn search_catalog_finds_dataloader() {
        let results = search_catalog("dataloader");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "@tensorify/dataloader");
    }

    #[test]
    fn search_catalog_case_insensitive() {
        let results = search_catalog("ADAM");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].plugin_type, PluginType::Optimizer);
    }

    #[test]
    fn search_catalog_by_description() {
        let results = search_catalog("affine transformation");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "@tensorify/linear");
    }

    #[test]
    fn search_catalog_empty_returns_all() {
        assert_eq!(search_catalog("").len(), 7);
    }

    #[test]
    fn search_catalog_no_match() {
        assert!(search_catalog("xyz_nonexistent").is_empty());
    }

    #[test]
    fn registry_resolves_latest_builtin() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.len(), 7);
        let plugin = registry.resolve("@tensorify/conv2d:latest").unwrap();
        assert_eq!(plugin.manifest().slug, "@tensorify/conv2d:1.0.0");
        assert_eq!(registry.by_plugin_type(PluginType::ModelLayer).len(), 2);
    }
}
