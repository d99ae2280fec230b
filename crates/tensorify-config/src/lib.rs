// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Tensorify plugin engine.
//!
//! TOML files are layered with Figment, overridden by `TENSORIFY_*`
//! environment variables, then validated. Failures come back as miette
//! diagnostics with typo suggestions.
//!
//! ```no_run
//! let config = tensorify_config::load_and_validate().expect("config errors");
//! println!("gateway on {}", config.gateway.bind_address());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    GatewayConfig, LogConfig, RetryConfig, StorageBackend, StorageConfig, TensorifyConfig,
    WebhookConfig,
};

/// Loads the layered configuration and validates it.
pub fn load_and_validate() -> Result<TensorifyConfig, Vec<ConfigError>> {
    finish(loader::load_config(), read_sources(&loader::config_paths()))
}

/// Loads defaults plus `path` (and env overrides), then validates.
pub fn load_and_validate_path(path: &Path) -> Result<TensorifyConfig, Vec<ConfigError>> {
    finish(
        loader::load_config_from_path(path),
        read_sources(&[path.to_path_buf()]),
    )
}

/// Loads defaults plus an inline document, then validates.
pub fn load_and_validate_str(toml_content: &str) -> Result<TensorifyConfig, Vec<ConfigError>> {
    finish(
        loader::load_config_from_str(toml_content),
        vec![("<inline>".to_string(), toml_content.to_string())],
    )
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<TensorifyConfig, figment::Error>,
    sources: Vec<(String, String)>,
) -> Result<TensorifyConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources)),
    }
}

/// Reads whichever config files exist, for diagnostic source spans.
fn read_sources(paths: &[std::path::PathBuf]) -> Vec<(String, String)> {
    paths
        .iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(path).ok()?;
            let shown = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
            Some((shown.display().to_string(), content))
        })
        .collect()
}
