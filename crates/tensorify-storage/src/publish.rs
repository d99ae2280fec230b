// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin publishing.
//!
//! Publishing normalizes the manifest, uploads the plugin's files
//! concurrently and then tells a [`PublishNotifier`] about the release.
//! A failed notification does not undo the upload; the report records it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use tensorify_core::{PluginFileKind, PluginSlug, PluginType, TensorifyError};
use tensorify_plugin::normalize_ui_manifest;

use crate::adapter::{PluginStorage, StorageOutcome, UploadReceipt};

/// Default timeout for webhook delivery.
pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// An optional icon shipped alongside the plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl IconUpload {
    /// Builds an upload, guessing the content type from the extension.
    pub fn from_file_name(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = match file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
            Some(ext) if ext == "svg" => "image/svg+xml",
            Some(ext) if ext == "png" => "image/png",
            Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
            Some(ext) if ext == "webp" => "image/webp",
            _ => "application/octet-stream",
        };
        Self {
            file_name,
            bytes,
            content_type: content_type.to_string(),
        }
    }

    /// The icon must live directly under the plugin prefix and must not
    /// shadow the code or manifest object.
    fn check_file_name(&self) -> Result<(), TensorifyError> {
        let name = self.file_name.as_str();
        let reason = if name.is_empty() || name == "." || name == ".." {
            "is not a file name"
        } else if name.contains(['/', '\\']) {
            "must not contain a path separator"
        } else if PluginFileKind::from_file_name(name).is_some() {
            "collides with a plugin file"
        } else {
            return Ok(());
        };
        Err(TensorifyError::permanent_storage(format!("icon `{name}` {reason}")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub slug: String,
    pub code: String,
    pub manifest: Value,
    pub icon: Option<IconUpload>,
}

/// Delivery state of the publish notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Sent,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub slug: String,
    pub uploaded: Vec<UploadReceipt>,
    pub notification: NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_error: Option<String>,
}

/// Event delivered to notifiers after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEvent {
    pub event: String,
    pub slug: String,
    pub name: String,
    pub version: String,
    pub plugin_type: PluginType,
    pub files: Vec<String>,
    pub published_at: DateTime<Utc>,
}

/// Receives publish events.
#[async_trait]
pub trait PublishNotifier: Send + Sync {
    async fn notify(&self, event: &PublishEvent) -> Result<(), TensorifyError>;
}

/// Posts publish events as JSON to a webhook URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TensorifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TensorifyError::Notification {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PublishNotifier for WebhookNotifier {
    async fn notify(&self, event: &PublishEvent) -> Result<(), TensorifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| TensorifyError::Notification {
                message: format!("webhook request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TensorifyError::Notification {
                message: format!("webhook returned HTTP {status}"),
                source: None,
            });
        }
        Ok(())
    }
}

/// Uploads plugins and announces them.
pub struct PluginPublisher {
    storage: PluginStorage,
    notifier: Option<Arc<dyn PublishNotifier>>,
}

impl PluginPublisher {
    pub fn new(storage: PluginStorage) -> Self {
        Self {
            storage,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn PublishNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub async fn publish(&self, request: PublishRequest) -> StorageOutcome<PublishReport> {
        match self.try_publish(request).await {
            Ok(report) => StorageOutcome::ok(report),
            Err(err) => {
                warn!(error = %err, "plugin publish failed");
                StorageOutcome::failed(err.to_string())
            }
        }
    }

    async fn try_publish(&self, request: PublishRequest) -> Result<PublishReport, TensorifyError> {
        let slug = PluginSlug::parse(&request.slug)?;
        let manifest = normalize_ui_manifest(request.manifest)?;
        if manifest.slug != request.slug {
            return Err(TensorifyError::InvalidSlug {
                slug: request.slug,
                reason: format!("manifest declares `{}`", manifest.slug),
            });
        }
        if let Some(icon) = &request.icon {
            icon.check_file_name()?;
        }
        let manifest_json = serde_json::to_value(&manifest)
            .map_err(|e| TensorifyError::Internal(format!("manifest serialization failed: {e}")))?;

        // Icon names are checked above, so the three keys are distinct.
        let icon = request.icon;
        let code_upload = self
            .storage
            .put_file(&slug, PluginFileKind::Code, request.code.into_bytes());
        let manifest_upload = self.storage.put_manifest_json(&slug, &manifest_json);
        let icon_upload = async {
            match &icon {
                Some(icon) => Some(
                    self.storage
                        .put_object(slug.object_key(&icon.file_name), icon.bytes.clone(), &icon.content_type)
                        .await,
                ),
                None => None,
            }
        };
        let (code, manifest_result, icon_result) =
            futures::join!(code_upload, manifest_upload, icon_upload);

        // Every result is inspected before failing so all errors are reported.
        let results: Vec<_> = [Some(code), Some(manifest_result), icon_result]
            .into_iter()
            .flatten()
            .collect();
        let mut uploaded = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(receipt) => uploaded.push(receipt),
                Err(err) => failures.push(err.to_string()),
            }
        }
        if !failures.is_empty() {
            return Err(TensorifyError::permanent_storage(format!(
                "upload failed: {}",
                failures.join("; ")
            )));
        }

        info!(slug = %slug, files = uploaded.len(), "plugin uploaded");

        let (notification, notification_error) = match &self.notifier {
            None => (NotificationStatus::Skipped, None),
            Some(notifier) => {
                let event = PublishEvent {
                    event: "plugin.published".to_string(),
                    slug: slug.to_string(),
                    name: manifest.name.clone(),
                    version: manifest.version.clone(),
                    plugin_type: manifest.plugin_type,
                    files: uploaded.iter().map(|r| r.key.clone()).collect(),
                    published_at: Utc::now(),
                };
                match notifier.notify(&event).await {
                    Ok(()) => (NotificationStatus::Sent, None),
                    Err(err) => {
                        warn!(slug = %slug, error = %err, "publish notification failed, upload kept");
                        (NotificationStatus::Failed, Some(err.to_string()))
                    }
                }
            }
        };

        Ok(PublishReport {
            slug: slug.to_string(),
            uploaded,
            notification,
            notification_error,
        })
    }
}
