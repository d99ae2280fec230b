// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams shared across the Tensorify workspace.
//!
//! Backends use `#[async_trait]` for dynamic dispatch compatibility.

pub mod object_store;

pub use object_store::{ObjectEntry, ObjectPage, ObjectStore};
