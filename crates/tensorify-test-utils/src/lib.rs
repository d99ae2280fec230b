// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tensorify integration tests.
//!
//! Provides manifest fixtures and a fault-injecting object store for fast,
//! deterministic tests without external services.
//!
//! # Components
//!
//! - [`fixtures`] - Raw manifest JSON in the shape the editor produces
//! - [`FlakyObjectStore`] - Object store wrapper that fails on demand

pub mod fixtures;
pub mod flaky_store;

pub use flaky_store::{FlakyObjectStore, StoreOp};
