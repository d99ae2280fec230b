// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers.
//!
//! - `GET /health`
//! - `POST /v1/plugin/getManifest`
//! - `POST /v1/plugin/getResult`

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use tensorify_core::TensorifyError;
use tensorify_plugin::{GeneratedCodeArtifact, PluginManifest, TranslationContext};

use crate::envelope::{ApiError, ApiSuccess};
use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ManifestRequest {
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct ResultRequest {
    pub slug: String,
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default)]
    pub context: Option<TranslationContext>,
}

pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Built-in plugins answer first; anything else is read from storage and
/// normalized.
pub async fn get_manifest(
    State(state): State<GatewayState>,
    body: Result<Json<ManifestRequest>, JsonRejection>,
) -> Result<ApiSuccess<PluginManifest>, ApiError> {
    let Json(request) = body?;
    match state.registry.resolve(&request.slug) {
        Ok(plugin) => Ok(ApiSuccess::new(plugin.manifest().clone())),
        Err(TensorifyError::PluginNotFound { .. }) => {
            debug!(slug = %request.slug, "not a registered plugin, reading stored manifest");
            let manifest = state.storage.load_manifest(&request.slug).await.into_result()?;
            Ok(ApiSuccess::new(manifest))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn get_result(
    State(state): State<GatewayState>,
    body: Result<Json<ResultRequest>, JsonRejection>,
) -> Result<ApiSuccess<GeneratedCodeArtifact>, ApiError> {
    let Json(request) = body?;
    let plugin = state.registry.resolve(&request.slug)?;
    let context = request.context.unwrap_or_default();
    let artifact = plugin.generate(&request.settings, &context)?;
    debug!(slug = %request.slug, bindings = ?artifact.bindings, "generated plugin code");
    Ok(ApiSuccess::new(artifact))
}
