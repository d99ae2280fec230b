// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin storage for the Tensorify plugin engine.
//!
//! [`PluginStorage`] wraps any [`tensorify_core::ObjectStore`] with retries
//! and the plugin file layout. [`PluginPublisher`] builds on it to validate,
//! upload and announce new plugin versions.

pub mod adapter;
pub mod fs;
pub mod memory;
mod paging;
pub mod publish;
pub mod retry;

pub use adapter::{
    ManifestPayload, PluginFile, PluginPresence, PluginStorage, StorageOutcome, StoredPlugin,
    UploadReceipt,
};
pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;
pub use publish::{
    IconUpload, NotificationStatus, PluginPublisher, PublishEvent, PublishNotifier, PublishReport,
    PublishRequest, WebhookNotifier, DEFAULT_WEBHOOK_TIMEOUT,
};
pub use retry::{retry_with_backoff, RetryPolicy};
