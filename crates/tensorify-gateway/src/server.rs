// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and the listening loop.

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tensorify_core::TensorifyError;
use tensorify_plugin::PluginRegistry;
use tensorify_storage::PluginStorage;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// State shared by all handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub registry: Arc<PluginRegistry>,
    pub storage: Arc<PluginStorage>,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// `/health` is public; `/v1/*` goes through the auth layer.
pub fn router(state: GatewayState) -> Router {
    let api_routes = Router::new()
        .route("/v1/plugin/getManifest", post(handlers::get_manifest))
        .route("/v1/plugin/getResult", post(handlers::get_result))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::get_health))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds and serves until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), TensorifyError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TensorifyError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!(%addr, plugins = state.registry.len(), "gateway listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| TensorifyError::Internal(format!("gateway server error: {e}")))
}
