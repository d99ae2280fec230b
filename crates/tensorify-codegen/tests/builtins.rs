// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end checks over the built-in plugins: their manifests survive
//! normalization, and rendering through the registry is validated and
//! deterministic.

use serde_json::{json, Map, Value};

use tensorify_codegen::{builtin_catalog, builtin_registry};
use tensorify_core::{HandleDataType, TensorifyError};
use tensorify_plugin::{normalize_ui_manifest, TranslationContext};

fn settings(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn every_builtin_manifest_normalizes_to_itself() {
    for manifest in builtin_catalog() {
        let raw = serde_json::to_value(&manifest).unwrap();
        let normalized = normalize_ui_manifest(raw)
            .unwrap_or_else(|e| panic!("{} failed to normalize: {e}", manifest.slug));
        assert_eq!(normalized, manifest);
    }
}

#[test]
fn every_builtin_has_its_own_primary_icon() {
    let mut icons: Vec<String> = builtin_catalog()
        .into_iter()
        .filter_map(|m| m.visual.icons.primary.map(|icon| icon.value))
        .collect();
    assert_eq!(icons.len(), 7);
    icons.sort();
    icons.dedup();
    assert_eq!(icons.len(), 7, "{icons:?}");
}

#[test]
fn dataloader_renders_through_registry() {
    let registry = builtin_registry().unwrap();
    let plugin = registry.resolve("@tensorify/dataloader:1.0.0").unwrap();
    let code = plugin
        .get_translation_code(
            &settings(json!({
                "batch_size": 32,
                "shuffle": true,
                "num_workers": 0,
                "emitDataloaderVar": true
            })),
            &TranslationContext::new(),
        )
        .unwrap();
    assert_eq!(
        code,
        "dataloader = torch.utils.data.DataLoader(\n    dataset=dataset,\n    batch_size=32,\n    shuffle=True\n)"
    );
}

#[test]
fn rejected_settings_generate_nothing() {
    let registry = builtin_registry().unwrap();
    let plugin = registry.resolve("@tensorify/dataloader:latest").unwrap();
    for bad in [json!({ "batch_size": 0 }), json!({ "num_workers": 33 })] {
        let result = plugin.generate(&settings(bad), &TranslationContext::new());
        assert!(matches!(result, Err(TensorifyError::InvalidSettings { .. })));
    }
}

#[test]
fn generation_is_byte_identical_across_calls() {
    let registry = builtin_registry().unwrap();
    let ctx = TranslationContext::new()
        .with_input("model", "net")
        .with_input("dataloader", "loader")
        .with_unbound_input("optimizer");
    for entry in registry.list_all() {
        let a = entry.plugin.generate(&Map::new(), &ctx);
        let b = entry.plugin.generate(&Map::new(), &ctx);
        match (a, b) {
            (Ok(a), Ok(b)) => assert_eq!(a, b, "{}", entry.slug),
            (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
            _ => panic!("{} was not deterministic", entry.slug),
        }
    }
}

#[test]
fn model_pipeline_composes_layers() {
    let registry = builtin_registry().unwrap();
    let ctx = TranslationContext::new();
    let linear = registry
        .resolve("@tensorify/linear:latest")
        .unwrap()
        .get_translation_code(&settings(json!({ "in_features": 784, "out_features": 10 })), &ctx)
        .unwrap();
    let model = registry
        .resolve("@tensorify/sequential:latest")
        .unwrap()
        .generate(&Map::new(), &TranslationContext::new().with_child(linear))
        .unwrap();

    assert!(model.code.starts_with("model = nn.Sequential(\n    nn.Linear("));
    assert_eq!(model.bindings.len(), 1);
    assert_eq!(model.bindings[0].data_type, HandleDataType::Model);
    assert_eq!(model.bindings[0].name, "model");
    assert_eq!(model.imports, vec!["from torch import nn".to_string()]);
}
