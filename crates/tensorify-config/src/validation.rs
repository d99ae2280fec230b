// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.
//!
//! Every check runs; the caller gets all errors at once.

use crate::diagnostic::ConfigError;
use crate::model::{StorageBackend, TensorifyConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate_config(config: &TensorifyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.log.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::invalid(
            "log.level",
            format!("must be one of {}, got `{}`", LOG_LEVELS.join(", "), config.log.level),
        ));
    }

    check_gateway(config, &mut errors);
    check_storage(config, &mut errors);

    let retry = &config.retry;
    if retry.max_attempts == 0 {
        errors.push(ConfigError::invalid("retry.max_attempts", "must be at least 1"));
    }
    if retry.base_delay_ms > retry.max_delay_ms {
        errors.push(ConfigError::invalid(
            "retry.base_delay_ms",
            format!(
                "must not exceed retry.max_delay_ms ({} > {})",
                retry.base_delay_ms, retry.max_delay_ms
            ),
        ));
    }

    if let Some(url) = &config.webhook.url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        errors.push(ConfigError::invalid(
            "webhook.url",
            format!("must be an http(s) URL, got `{url}`"),
        ));
    }
    if config.webhook.timeout_secs == 0 {
        errors.push(ConfigError::invalid("webhook.timeout_secs", "must be at least 1"));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_gateway(config: &TensorifyConfig, errors: &mut Vec<ConfigError>) {
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::invalid("gateway.host", "must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::invalid(
            "gateway.host",
            format!("`{host}` is not an IP address or hostname"),
        ));
    }
    if config.gateway.port == 0 {
        errors.push(ConfigError::invalid("gateway.port", "must not be 0"));
    }
    if let Some(token) = &config.gateway.bearer_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::invalid(
            "gateway.bearer_token",
            "must not be empty when set; remove the key to disable auth",
        ));
    }
}

fn check_storage(config: &TensorifyConfig, errors: &mut Vec<ConfigError>) {
    let storage = &config.storage;
    if storage.backend == StorageBackend::Filesystem && storage.root.trim().is_empty() {
        errors.push(ConfigError::invalid(
            "storage.root",
            "must not be empty with the filesystem backend",
        ));
    }
    // An absent bucket is allowed; storage operations report it instead.
    if let Some(bucket) = &storage.bucket {
        let valid = (3..=63).contains(&bucket.len())
            && bucket
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
            && !bucket.starts_with(['-', '.'])
            && !bucket.ends_with(['-', '.']);
        if !valid {
            errors.push(ConfigError::invalid(
                "storage.bucket",
                format!(
                    "`{bucket}` must be 3-63 lowercase letters, digits, `-` or `.`, \
                     starting and ending with a letter or digit"
                ),
            ));
        }
    }
}
