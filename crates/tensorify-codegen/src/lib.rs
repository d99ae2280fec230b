// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Python code generation for Tensorify workflows.
//!
//! [`python`] holds the literal and call rendering rules every template
//! shares. [`builtin`] holds the plugins compiled into the engine and
//! [`catalog`] exposes them as manifests or a ready registry.

pub mod builtin;
pub mod catalog;
pub mod python;

pub use catalog::{builtin_catalog, builtin_plugins, builtin_registry, search_catalog};
pub use python::{literal, PyCall};
