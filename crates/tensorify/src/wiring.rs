// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds runtime components from configuration.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use tensorify_config::{StorageBackend, TensorifyConfig};
use tensorify_core::{ObjectStore, TensorifyError};
use tensorify_storage::{
    FsObjectStore, MemoryObjectStore, PluginPublisher, PluginStorage, RetryPolicy, WebhookNotifier,
};

/// Installs the global subscriber. `RUST_LOG` overrides `log.level`.
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let level = level.to_ascii_lowercase();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tensorify={level},tower_http={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

pub fn retry_policy(config: &TensorifyConfig) -> RetryPolicy {
    RetryPolicy {
        max_attempts: config.retry.max_attempts.max(1),
        base_delay: config.retry.base_delay(),
        max_delay: config.retry.max_delay(),
    }
}

/// Storage for the configured bucket, or an unconfigured handle whose
/// operations report the missing bucket.
pub fn build_storage(config: &TensorifyConfig) -> PluginStorage {
    let Some(bucket) = &config.storage.bucket else {
        warn!("storage.bucket is not set, plugin storage operations will fail");
        return PluginStorage::unconfigured();
    };
    let store: Arc<dyn ObjectStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryObjectStore::new()),
        StorageBackend::Filesystem => {
            Arc::new(FsObjectStore::new(Path::new(&config.storage.root).join(bucket)))
        }
    };
    info!(backend = store.backend(), %bucket, "plugin storage ready");
    PluginStorage::new(store, retry_policy(config))
}

pub fn build_publisher(config: &TensorifyConfig) -> Result<PluginPublisher, TensorifyError> {
    let publisher = PluginPublisher::new(build_storage(config));
    match &config.webhook.url {
        Some(url) => {
            let notifier = WebhookNotifier::new(url.clone(), config.webhook.timeout())?;
            Ok(publisher.with_notifier(Arc::new(notifier)))
        }
        None => Ok(publisher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn retry_policy_follows_config() {
        let mut config = TensorifyConfig::default();
        config.retry.max_attempts = 5;
        config.retry.base_delay_ms = 20;
        config.retry.max_delay_ms = 500;
        let policy = retry_policy(&config);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(20));
        assert_eq!(policy.max_delay, Duration::from_millis(500));
    }

    #[test]
    fn missing_bucket_leaves_storage_unconfigured() {
        let config = TensorifyConfig::default();
        assert!(!build_storage(&config).is_configured());
    }

    #[test]
    fn filesystem_backend_roots_bucket_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TensorifyConfig::default();
        config.storage.backend = StorageBackend::Filesystem;
        config.storage.root = dir.path().display().to_string();
        config.storage.bucket = Some("plugins".into());
        assert!(build_storage(&config).is_configured());
    }
}
