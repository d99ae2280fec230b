// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fault-injecting object store for deterministic retry tests.
//!
//! `FlakyObjectStore` wraps any [`ObjectStore`] and fails a configurable
//! number of upcoming calls before delegating. Every call is counted.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tensorify_core::{ObjectPage, ObjectStore, TensorifyError};

/// Object store operations, for targeting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Put,
    Get,
    Head,
    Delete,
    List,
}

/// A queued failure: which operation it applies to (any when `None`) and
/// whether it should be reported as transient.
#[derive(Debug, Clone, Copy)]
struct Fault {
    op: Option<StoreOp>,
    transient: bool,
}

/// An object store wrapper that fails on demand.
pub struct FlakyObjectStore {
    inner: Arc<dyn ObjectStore>,
    faults: Mutex<VecDeque<Fault>>,
    calls: AtomicUsize,
}

impl FlakyObjectStore {
    /// Wrap `inner` with an empty fault queue.
    pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
        Self {
            inner,
            faults: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail the next `n` calls of any operation with a transient error.
    pub async fn fail_next(&self, n: usize) {
        self.push(None, true, n).await;
    }

    /// Fail the next `n` calls of `op` with a transient error.
    pub async fn fail_next_op(&self, op: StoreOp, n: usize) {
        self.push(Some(op), true, n).await;
    }

    /// Fail the next call of any operation with a permanent error.
    pub async fn fail_permanently(&self) {
        self.push(None, false, 1).await;
    }

    /// Total calls seen, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn push(&self, op: Option<StoreOp>, transient: bool, n: usize) {
        let mut faults = self.faults.lock().await;
        faults.extend(std::iter::repeat_n(Fault { op, transient }, n));
    }

    async fn check(&self, op: StoreOp) -> Result<(), TensorifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut faults = self.faults.lock().await;
        let Some(index) = faults
            .iter()
            .position(|f| f.op.is_none_or(|target| target == op))
        else {
            return Ok(());
        };
        let Some(fault) = faults.remove(index) else {
            return Ok(());
        };
        let message = format!("injected {op:?} failure");
        Err(if fault.transient {
            TensorifyError::transient_storage(message)
        } else {
            TensorifyError::permanent_storage(message)
        })
    }
}

#[async_trait]
impl ObjectStore for FlakyObjectStore {
    fn backend(&self) -> &'static str {
        "flaky"
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), TensorifyError> {
        self.check(StoreOp::Put).await?;
        self.inner.put_object(key, body, content_type).await
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, TensorifyError> {
        self.check(StoreOp::Get).await?;
        self.inner.get_object(key).await
    }

    async fn head_object(&self, key: &str) -> Result<bool, TensorifyError> {
        self.check(StoreOp::Head).await?;
        self.inner.head_object(key).await
    }

    async fn delete_object(&self, key: &str) -> Result<(), TensorifyError> {
        self.check(StoreOp::Delete).await?;
        self.inner.delete_object(key).await
    }

    async fn list_objects(
        &self,
        prefix: &str,
        continuation: Option<String>,
        max_keys: usize,
    ) -> Result<ObjectPage, TensorifyError> {
        self.check(StoreOp::List).await?;
        self.inner.list_objects(prefix, continuation, max_keys).await
    }
}
