// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tensorify plugin engine.
//!
//! This crate provides the error type, plugin slugs, the closed enums shared
//! by manifests and handles, and the object store trait every storage
//! backend implements.

pub mod error;
pub mod slug;
pub mod traits;
pub mod types;

pub use error::{FieldViolation, TensorifyError};
pub use slug::{PluginSlug, SlugVersion, STRICT_SLUG_PATTERN, TOOL_SLUG_PATTERN};
pub use traits::{ObjectEntry, ObjectPage, ObjectStore};
pub use types::{HandleDataType, HandlePosition, PluginFileKind, PluginType};
