// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw manifest fixtures.
//!
//! Each function returns a fresh, valid manifest so tests can mutate one
//! field and assert on the resulting failure.

use serde_json::{json, Value};

/// A model layer with the mandatory `prev`/`next` flow handles.
pub fn layer_manifest() -> Value {
    json!({
        "name": "@acme/linear",
        "version": "1.0.0",
        "slug": "@acme/linear:1.0.0",
        "description": "Fully connected layer",
        "pluginType": "model_layer",
        "visual": {
            "containerType": "default",
            "size": { "width": 220, "height": 140 },
            "icons": { "primary": { "type": "lucide", "value": "layers" } },
            "labels": { "title": "Linear" }
        },
        "inputHandles": [
            { "id": "prev", "position": "left", "dataType": "any", "required": true }
        ],
        "outputHandles": [
            { "id": "next", "position": "right", "dataType": "model_layer" }
        ],
        "settingsFields": [
            {
                "key": "in_features",
                "label": "In features",
                "type": "INPUT_NUMBER",
                "dataType": "NUMBER",
                "required": true,
                "validation": { "min": 1 }
            },
            {
                "key": "out_features",
                "label": "Out features",
                "type": "INPUT_NUMBER",
                "dataType": "NUMBER",
                "required": true,
                "validation": { "min": 1 }
            }
        ]
    })
}

/// A dataloader, a variable provider that needs no flow handles and emits
/// a `dataloader` variable behind the `emitDataloaderVar` toggle.
pub fn dataloader_manifest() -> Value {
    json!({
        "name": "@acme/dataloader",
        "version": "1.0.0",
        "slug": "@acme/dataloader:1.0.0",
        "description": "Batches a dataset",
        "pluginType": "dataloader",
        "inputHandles": [
            { "id": "dataset", "position": "left", "dataType": "dataset", "required": true }
        ],
        "outputHandles": [
            { "id": "dataloader", "position": "right", "dataType": "dataloader" }
        ],
        "settingsFields": [
            {
                "key": "batch_size",
                "label": "Batch size",
                "type": "INPUT_NUMBER",
                "dataType": "NUMBER",
                "defaultValue": 32,
                "required": true,
                "validation": { "min": 1, "max": 4096 }
            },
            {
                "key": "shuffle",
                "label": "Shuffle",
                "type": "TOGGLE",
                "dataType": "BOOLEAN",
                "defaultValue": true
            },
            {
                "key": "emitDataloaderVar",
                "label": "Emit dataloader variable",
                "type": "TOGGLE",
                "dataType": "BOOLEAN",
                "defaultValue": true,
                "required": true
            }
        ],
        "emits": {
            "variables": [
                {
                    "value": "dataloader",
                    "switchKey": "settingsFields.emitDataloaderVar",
                    "isOnByDefault": true,
                    "type": "dataloader"
                }
            ],
            "imports": [{ "path": "torch" }]
        }
    })
}

/// Index of the settings field with `key` in a raw manifest.
///
/// # Panics
///
/// Panics when the manifest has no such field.
pub fn field_index(manifest: &Value, key: &str) -> usize {
    manifest["settingsFields"]
        .as_array()
        .and_then(|fields| fields.iter().position(|f| f["key"] == key))
        .unwrap_or_else(|| panic!("fixture has no settings field `{key}`"))
}

/// Plugin bundle source used when a test needs some code to upload.
pub fn sample_code() -> &'static str {
    "export default function translate(settings) { return `nn.Linear()`; }\n"
}
