// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object store backed by a local directory.
//!
//! Keys map to relative paths under the root. Keys that are empty, absolute
//! or contain `.`/`..` segments are rejected before touching the disk.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use tensorify_core::{ObjectEntry, ObjectPage, ObjectStore, TensorifyError};

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, TensorifyError> {
        let relative = Path::new(key);
        let traversal = key.is_empty()
            || key.contains('\\')
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if traversal {
            return Err(TensorifyError::permanent_storage(format!(
                "path traversal blocked for key `{key}`"
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Walks the directory tree, returning every file as a key entry.
    async fn collect_entries(&self) -> Result<Vec<ObjectEntry>, TensorifyError> {
        let mut entries = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let mut reader = match tokio::fs::read_dir(&dir).await {
                Ok(reader) => reader,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(item) = reader.next_entry().await? {
                let metadata = item.metadata().await?;
                let path = item.path();
                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(key) = key_for(&self.root, &path) else {
                    debug!(path = %path.display(), "skipping non UTF-8 object path");
                    continue;
                };
                let last_modified = metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                entries.push(ObjectEntry {
                    key,
                    size: metadata.len(),
                    last_modified,
                });
            }
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
}

fn key_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    fn backend(&self) -> &'static str {
        "filesystem"
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), TensorifyError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, TensorifyError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn head_object(&self, key: &str) -> Result<bool, TensorifyError> {
        let path = self.path_for(key)?;
        match tokio::fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_object(&self, key: &str) -> Result<(), TensorifyError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_objects(
        &self,
        prefix: &str,
        continuation: Option<String>,
        max_keys: usize,
    ) -> Result<ObjectPage, TensorifyError> {
        let entries = self
            .collect_entries()
            .await?
            .into_iter()
            .filter(|e| e.key.starts_with(prefix));
        Ok(crate::paging::page(entries, continuation.as_deref(), max_keys))
    }
}
