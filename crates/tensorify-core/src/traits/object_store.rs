// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value object store consumed by the plugin file storage adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::TensorifyError;

/// Metadata for one object returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// One page of a prefix listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    /// Entries in ascending key order.
    pub entries: Vec<ObjectEntry>,
    /// Token to pass back to fetch the next page; `None` when exhausted.
    pub next_token: Option<String>,
}

/// Adapter for a flat key/value object store (S3-style buckets, local
/// directories, in-memory maps).
///
/// Implementations report retryable failures with
/// [`TensorifyError::transient_storage`] so callers can back off.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Short backend tag for logs (`memory`, `filesystem`, ...).
    fn backend(&self) -> &'static str;

    /// Writes (or replaces) an object.
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), TensorifyError>;

    /// Reads an object, returning `None` when the key does not exist.
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, TensorifyError>;

    /// Returns whether the key exists.
    async fn head_object(&self, key: &str) -> Result<bool, TensorifyError>;

    /// Deletes an object. Deleting a missing key is not an error.
    async fn delete_object(&self, key: &str) -> Result<(), TensorifyError>;

    /// Lists keys starting with `prefix`, at most `max_keys` per page,
    /// resuming after `continuation` when given.
    async fn list_objects(
        &self,
        prefix: &str,
        continuation: Option<String>,
        max_keys: usize,
    ) -> Result<ObjectPage, TensorifyError>;
}
