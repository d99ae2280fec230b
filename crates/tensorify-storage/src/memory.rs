// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process object store backed by an ordered map.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use tensorify_core::{ObjectEntry, ObjectPage, ObjectStore, TensorifyError};

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Object store that keeps everything in memory. Used by `serve` when no
/// bucket is configured and throughout the tests.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content type recorded for `key`, if the object exists.
    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|o| o.content_type.clone())
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), TensorifyError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, TensorifyError> {
        Ok(self.objects.read().await.get(key).map(|o| o.body.clone()))
    }

    async fn head_object(&self, key: &str) -> Result<bool, TensorifyError> {
        Ok(self.objects.read().await.contains_key(key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), TensorifyError> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn list_objects(
        &self,
        prefix: &str,
        continuation: Option<String>,
        max_keys: usize,
    ) -> Result<ObjectPage, TensorifyError> {
        let objects = self.objects.read().await;
        let entries = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectEntry {
                key: key.clone(),
                size: object.body.len() as u64,
                last_modified: object.last_modified,
            });
        Ok(crate::paging::page(entries, continuation.as_deref(), max_keys))
    }
}
