// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tensorify plugin engine.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure.
///
/// `field` is a dotted or JSON-pointer style path (e.g. `settingsFields/2/key`
/// or `batch_size`), `message` is human readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Joins violations as `a: msg; b: msg` for error display.
fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The primary error type used across the Tensorify workspace.
#[derive(Debug, Error)]
pub enum TensorifyError {
    /// The manifest does not conform to the manifest schema.
    #[error("manifest schema violation: {}", join_violations(violations))]
    ManifestSchema { violations: Vec<FieldViolation> },

    /// A non-provider plugin is missing one of its mandatory flow handles.
    #[error("missing required {direction} handle `{handle}`: {detail}")]
    MissingHandle {
        direction: &'static str,
        handle: String,
        detail: String,
    },

    /// An emitted variable does not line up with its switch settings field.
    #[error("emitted variable `{variable}` does not match settings field `{field}`: {reason}")]
    EmitMismatch {
        variable: String,
        field: String,
        reason: String,
    },

    /// Settings handed to a plugin failed validation against its fields.
    #[error("invalid settings: {}", join_violations(violations))]
    InvalidSettings { violations: Vec<FieldViolation> },

    /// A plugin slug did not match the expected grammar.
    #[error("invalid plugin slug `{slug}`: {reason}")]
    InvalidSlug { slug: String, reason: String },

    /// A required upstream service or configuration value is absent.
    #[error("missing dependency: {0}")]
    MissingDependency(String),

    /// Object store failures. `transient` marks failures worth retrying.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        transient: bool,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested object key does not exist in the store.
    #[error("object not found: {key}")]
    ObjectNotFound { key: String },

    /// No plugin is registered under the requested slug.
    #[error("plugin not found: {slug}")]
    PluginNotFound { slug: String },

    /// Publish notification (webhook) failed.
    #[error("notification failed: {message}")]
    Notification {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TensorifyError {
    /// Builds a storage error that the retry wrapper will retry.
    pub fn transient_storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            transient: true,
            source: None,
        }
    }

    /// Builds a storage error that is not retried.
    pub fn permanent_storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            transient: false,
            source: None,
        }
    }

    /// Whether retrying the failed operation could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage { transient: true, .. })
    }

    /// Field violations carried by validation errors, empty otherwise.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::ManifestSchema { violations } | Self::InvalidSettings { violations } => {
                violations
            }
            _ => &[],
        }
    }
}

impl From<std::io::Error> for TensorifyError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let transient = matches!(
            err.kind(),
            ErrorKind::Interrupted
                | ErrorKind::TimedOut
                | ErrorKind::WouldBlock
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
        );
        Self::Storage {
            message: err.to_string(),
            transient,
            source: Some(Box::new(err)),
        }
    }
}
