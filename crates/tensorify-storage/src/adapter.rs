// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin file storage.
//!
//! `PluginStorage` keeps each plugin's files under `namespace/name:version/`
//! in an object store: `index.js` holds the bundled code and
//! `manifest.json` the manifest. Every public operation returns a
//! [`StorageOutcome`]; failures are logged here and reported in the outcome
//! rather than propagated.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use tensorify_core::{ObjectStore, PluginFileKind, PluginSlug, TensorifyError};
use tensorify_plugin::{normalize_ui_manifest, PluginManifest};

use crate::retry::{retry_with_backoff, RetryPolicy};

/// Page size used when walking a listing.
const LIST_PAGE_SIZE: usize = 1000;

/// Result envelope of a storage operation.
///
/// Serializes as `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageOutcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> StorageOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Converts back into a `Result` for callers that want `?`.
    pub fn into_result(self) -> Result<T, TensorifyError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(TensorifyError::permanent_storage(
                self.error.unwrap_or_else(|| "storage operation failed".to_string()),
            )),
        }
    }
}

/// Which of a plugin's two files exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginPresence {
    pub code: bool,
    pub manifest: bool,
}

impl PluginPresence {
    /// A plugin counts as stored only when both files exist.
    pub fn exists(&self) -> bool {
        self.code && self.manifest
    }
}

/// A stored plugin found by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPlugin {
    pub slug: String,
    pub code_key: String,
    pub manifest_key: String,
    /// Combined size of code and manifest in bytes.
    pub size: u64,
    /// Most recent modification of either file.
    pub last_modified: DateTime<Utc>,
}

/// Key and size of an object that was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub key: String,
    pub size: u64,
}

/// Contents of one plugin file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginFile {
    pub key: String,
    pub kind: PluginFileKind,
    pub content: String,
}

/// Manifest body to upload: parsed JSON or raw text that must parse.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestPayload {
    Json(Value),
    Text(String),
}

impl From<Value> for ManifestPayload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for ManifestPayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl ManifestPayload {
    fn into_json(self) -> Result<Value, TensorifyError> {
        match self {
            ManifestPayload::Json(value) => Ok(value),
            ManifestPayload::Text(text) => serde_json::from_str(&text).map_err(|e| {
                TensorifyError::permanent_storage(format!("manifest payload is not valid JSON: {e}"))
            }),
        }
    }
}

/// Plugin file storage over an object store.
#[derive(Clone)]
pub struct PluginStorage {
    store: Option<Arc<dyn ObjectStore>>,
    retry: RetryPolicy,
}

impl PluginStorage {
    pub fn new(store: Arc<dyn ObjectStore>, retry: RetryPolicy) -> Self {
        Self {
            store: Some(store),
            retry,
        }
    }

    /// Storage without a bucket. Every operation reports a missing
    /// dependency.
    pub fn unconfigured() -> Self {
        Self {
            store: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub async fn check_plugin_exists(&self, slug: &str) -> StorageOutcome<PluginPresence> {
        outcome("check_plugin_exists", slug, self.presence(slug).await)
    }

    /// Plugins under `prefix` that have both code and manifest, sorted by
    /// slug, at most `limit`.
    pub async fn list_plugin_files(&self, prefix: &str, limit: usize) -> StorageOutcome<Vec<StoredPlugin>> {
        outcome("list_plugin_files", prefix, self.list(prefix, limit).await)
    }

    pub async fn upload_plugin_code(&self, slug: &str, code: &str) -> StorageOutcome<UploadReceipt> {
        let result = async {
            let slug = PluginSlug::parse(slug)?;
            self.put_file(&slug, PluginFileKind::Code, code.as_bytes().to_vec())
                .await
        }
        .await;
        outcome("upload_plugin_code", slug, result)
    }

    pub async fn upload_plugin_manifest(
        &self,
        slug: &str,
        payload: impl Into<ManifestPayload>,
    ) -> StorageOutcome<UploadReceipt> {
        let payload = payload.into();
        let result = async {
            let parsed = PluginSlug::parse(slug)?;
            let json = payload.into_json()?;
            self.put_manifest_json(&parsed, &json).await
        }
        .await;
        outcome("upload_plugin_manifest", slug, result)
    }

    pub async fn delete_plugin_code(&self, slug: &str) -> StorageOutcome<String> {
        outcome(
            "delete_plugin_code",
            slug,
            self.delete_file(slug, PluginFileKind::Code).await,
        )
    }

    pub async fn delete_plugin_manifest(&self, slug: &str) -> StorageOutcome<String> {
        outcome(
            "delete_plugin_manifest",
            slug,
            self.delete_file(slug, PluginFileKind::Manifest).await,
        )
    }

    pub async fn get_plugin_file(&self, slug: &str, kind: PluginFileKind) -> StorageOutcome<PluginFile> {
        outcome("get_plugin_file", slug, self.read_file(slug, kind).await)
    }

    /// Fetches the stored manifest and runs it through the normalizer.
    pub async fn load_manifest(&self, slug: &str) -> StorageOutcome<PluginManifest> {
        let result = async {
            let file = self.read_file(slug, PluginFileKind::Manifest).await?;
            let raw: Value = serde_json::from_str(&file.content).map_err(|e| {
                TensorifyError::permanent_storage(format!("stored manifest is not valid JSON: {e}"))
            })?;
            normalize_ui_manifest(raw)
        }
        .await;
        outcome("load_manifest", slug, result)
    }

    fn store(&self) -> Result<&Arc<dyn ObjectStore>, TensorifyError> {
        self.store.as_ref().ok_or_else(|| {
            TensorifyError::MissingDependency(
                "plugin storage bucket is not configured (set storage.bucket)".to_string(),
            )
        })
    }

    pub(crate) async fn put_object(
        &self,
        key: String,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadReceipt, TensorifyError> {
        let store = self.store()?;
        let size = body.len() as u64;
        retry_with_backoff(&self.retry, "put_object", || {
            store.put_object(&key, body.clone(), content_type)
        })
        .await?;
        debug!(backend = store.backend(), key = %key, size, "object written");
        Ok(UploadReceipt { key, size })
    }

    pub(crate) async fn put_file(
        &self,
        slug: &PluginSlug,
        kind: PluginFileKind,
        body: Vec<u8>,
    ) -> Result<UploadReceipt, TensorifyError> {
        self.put_object(slug.file_key(kind), body, kind.content_type())
            .await
    }

    pub(crate) async fn put_manifest_json(
        &self,
        slug: &PluginSlug,
        manifest: &Value,
    ) -> Result<UploadReceipt, TensorifyError> {
        let body = serde_json::to_vec_pretty(manifest)
            .map_err(|e| TensorifyError::Internal(format!("manifest serialization failed: {e}")))?;
        self.put_file(slug, PluginFileKind::Manifest, body).await
    }

    async fn presence(&self, slug: &str) -> Result<PluginPresence, TensorifyError> {
        let slug = PluginSlug::parse(slug)?;
        let store = self.store()?;
        let code_key = slug.file_key(PluginFileKind::Code);
        let manifest_key = slug.file_key(PluginFileKind::Manifest);
        let code = retry_with_backoff(&self.retry, "head_object", || store.head_object(&code_key)).await?;
        let manifest =
            retry_with_backoff(&self.retry, "head_object", || store.head_object(&manifest_key)).await?;
        Ok(PluginPresence { code, manifest })
    }

    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<StoredPlugin>, TensorifyError> {
        let store = self.store()?;

        #[derive(Default)]
        struct Group {
            code_key: Option<String>,
            manifest_key: Option<String>,
            size: u64,
            last_modified: Option<DateTime<Utc>>,
        }

        let mut groups: BTreeMap<String, Group> = BTreeMap::new();
        let mut token = None;
        loop {
            let page = retry_with_backoff(&self.retry, "list_objects", || {
                store.list_objects(prefix, token.clone(), LIST_PAGE_SIZE)
            })
            .await?;

            for entry in page.entries {
                let Some((dir, file_name)) = entry.key.rsplit_once('/') else {
                    continue;
                };
                let Some(kind) = PluginFileKind::from_file_name(file_name) else {
                    continue;
                };
                let Ok(slug) = PluginSlug::from_storage_prefix(dir) else {
                    debug!(key = %entry.key, "skipping object outside the plugin key layout");
                    continue;
                };
                let group = groups.entry(slug.to_string()).or_default();
                match kind {
                    PluginFileKind::Code => group.code_key = Some(entry.key.clone()),
                    PluginFileKind::Manifest => group.manifest_key = Some(entry.key.clone()),
                }
                group.size += entry.size;
                group.last_modified = group.last_modified.max(Some(entry.last_modified));
            }

            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        Ok(groups
            .into_iter()
            .filter_map(|(slug, group)| {
                Some(StoredPlugin {
                    slug,
                    code_key: group.code_key?,
                    manifest_key: group.manifest_key?,
                    size: group.size,
                    last_modified: group.last_modified?,
                })
            })
            .take(limit)
            .collect())
    }

    async fn delete_file(&self, slug: &str, kind: PluginFileKind) -> Result<String, TensorifyError> {
        let slug = PluginSlug::parse(slug)?;
        let store = self.store()?;
        let key = slug.file_key(kind);
        retry_with_backoff(&self.retry, "delete_object", || store.delete_object(&key)).await?;
        debug!(key = %key, "object deleted");
        Ok(key)
    }

    async fn read_file(&self, slug: &str, kind: PluginFileKind) -> Result<PluginFile, TensorifyError> {
        let slug = PluginSlug::parse(slug)?;
        let store = self.store()?;
        let key = slug.file_key(kind);
        let bytes = retry_with_backoff(&self.retry, "get_object", || store.get_object(&key))
            .await?
            .ok_or_else(|| TensorifyError::ObjectNotFound { key: key.clone() })?;
        let content = String::from_utf8(bytes).map_err(|e| {
            TensorifyError::permanent_storage(format!("object `{key}` is not UTF-8: {e}"))
        })?;
        Ok(PluginFile { key, kind, content })
    }
}

/// Logs a failed operation and folds the result into an outcome.
fn outcome<T>(operation: &str, target: &str, result: Result<T, TensorifyError>) -> StorageOutcome<T> {
    match result {
        Ok(data) => StorageOutcome::ok(data),
        Err(err) => {
            error!(operation, target, error = %err, "plugin storage operation failed");
            StorageOutcome::failed(err.to_string())
        }
    }
}
