// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tensorify serve`: runs the gateway until SIGINT or SIGTERM.

use std::sync::Arc;

use tracing::{info, warn};

use tensorify_codegen::builtin_registry;
use tensorify_config::TensorifyConfig;
use tensorify_core::TensorifyError;
use tensorify_gateway::{start_server, AuthConfig, GatewayState, ServerConfig};

use crate::wiring;

pub async fn run_serve(config: TensorifyConfig) -> Result<(), TensorifyError> {
    let registry = builtin_registry()?;
    info!(plugins = registry.len(), "built-in plugins registered");

    let state = GatewayState {
        registry: Arc::new(registry),
        storage: Arc::new(wiring::build_storage(&config)),
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
    };
    if state.auth.bearer_token.is_none() {
        warn!("gateway.bearer_token is not set, /v1 routes are unauthenticated");
    }

    let server = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    start_server(&server, state, shutdown_signal()).await?;
    info!("gateway stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
