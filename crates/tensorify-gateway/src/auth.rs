// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optional bearer-token authentication for `/v1` routes.
//!
//! With no token configured every request passes. With a token, requests
//! must send `Authorization: Bearer <token>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::envelope::ApiError;

#[derive(Clone, Default)]
pub struct AuthConfig {
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl AuthConfig {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
        }
    }

    fn accepts(&self, header: Option<&str>) -> bool {
        let Some(expected) = &self.bearer_token else {
            return true;
        };
        header
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected)
    }
}

pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if !auth.accepts(header) {
        tracing::debug!(path = %request.uri().path(), "rejected request without valid bearer token");
        return Err(ApiError::unauthorized());
    }
    Ok(next.run(request).await)
}
