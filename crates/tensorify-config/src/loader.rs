// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order, later layers winning: compiled defaults,
//! `/etc/tensorify/tensorify.toml`, `~/.config/tensorify/tensorify.toml`,
//! `./tensorify.toml`, then `TENSORIFY_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TensorifyConfig;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TENSORIFY_";

/// Config sections that env var names are split on.
const SECTIONS: [&str; 5] = ["log", "gateway", "storage", "retry", "webhook"];

pub const SYSTEM_CONFIG_PATH: &str = "/etc/tensorify/tensorify.toml";
pub const LOCAL_CONFIG_PATH: &str = "tensorify.toml";

/// `~/.config/tensorify/tensorify.toml`, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tensorify").join("tensorify.toml"))
}

/// Config files consulted by [`load_config`], lowest precedence first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    paths.extend(user_config_path());
    paths.push(PathBuf::from(LOCAL_CONFIG_PATH));
    paths
}

pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(TensorifyConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

pub fn load_config() -> Result<TensorifyConfig, figment::Error> {
    build_figment().extract()
}

/// Loads defaults plus one explicit file, still honouring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<TensorifyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TensorifyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Loads defaults plus an inline TOML document. No env overrides.
pub fn load_config_from_str(toml_content: &str) -> Result<TensorifyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TensorifyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Maps a lowercased, prefix-stripped env var name to a dotted key.
///
/// Only the first underscore after a known section splits, so
/// `gateway_bearer_token` becomes `gateway.bearer_token`.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(field) = rest.strip_prefix('_')
            && !field.is_empty()
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| map_env_key(key.as_str()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("gateway_bearer_token"), "gateway.bearer_token");
        assert_eq!(map_env_key("retry_max_attempts"), "retry.max_attempts");
        assert_eq!(map_env_key("log_level"), "log.level");
        assert_eq!(map_env_key("webhook_timeout_secs"), "webhook.timeout_secs");
    }

    #[test]
    fn unknown_env_sections_pass_through() {
        assert_eq!(map_env_key("agent_name"), "agent_name");
        assert_eq!(map_env_key("storage_"), "storage_");
    }

    #[test]
    fn local_file_has_highest_file_precedence() {
        let paths = config_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from(SYSTEM_CONFIG_PATH)));
        assert_eq!(paths.last(), Some(&PathBuf::from(LOCAL_CONFIG_PATH)));
    }
}
