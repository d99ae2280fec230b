// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage-backed commands: `publish` and `list`.

use std::fmt::Write as _;
use std::path::Path;

use tensorify_config::TensorifyConfig;
use tensorify_core::TensorifyError;
use tensorify_storage::{IconUpload, PublishRequest};

use crate::plugin_cmds::read_json;
use crate::wiring;

/// Publishes the plugin and returns the report as pretty JSON.
pub async fn publish(
    config: &TensorifyConfig,
    slug: String,
    code: &Path,
    manifest: &Path,
    icon: Option<&Path>,
) -> Result<String, TensorifyError> {
    let code = std::fs::read_to_string(code)?;
    let manifest = read_json(manifest)?;
    let icon = match icon {
        Some(path) => {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    TensorifyError::Config(format!("icon path `{}` has no file name", path.display()))
                })?
                .to_string();
            Some(IconUpload::from_file_name(file_name, std::fs::read(path)?))
        }
        None => None,
    };

    let publisher = wiring::build_publisher(config)?;
    let report = publisher
        .publish(PublishRequest {
            slug,
            code,
            manifest,
            icon,
        })
        .await
        .into_result()?;
    serde_json::to_string_pretty(&report)
        .map_err(|e| TensorifyError::Internal(format!("report serialization failed: {e}")))
}

/// One line per stored plugin: slug, combined size, last modification.
pub async fn list(
    config: &TensorifyConfig,
    prefix: &str,
    limit: usize,
) -> Result<String, TensorifyError> {
    let storage = wiring::build_storage(config);
    let plugins = storage.list_plugin_files(prefix, limit).await.into_result()?;
    let mut out = String::new();
    for plugin in &plugins {
        let _ = writeln!(
            out,
            "{}  {} bytes  {}",
            plugin.slug,
            plugin.size,
            plugin.last_modified.to_rfc3339()
        );
    }
    if plugins.is_empty() {
        let _ = writeln!(out, "no stored plugins under `{prefix}`");
    }
    Ok(out)
}
