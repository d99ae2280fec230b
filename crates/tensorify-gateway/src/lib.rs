// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Tensorify plugin engine.
//!
//! Serves plugin manifests and generated code over JSON. Built-in plugins
//! come from the registry; stored plugins are read through
//! [`tensorify_storage::PluginStorage`].

pub mod auth;
pub mod envelope;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use envelope::{ApiError, ApiSuccess, Meta};
pub use server::{router, start_server, GatewayState, ServerConfig};
