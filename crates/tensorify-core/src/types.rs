// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closed enums shared by manifests, handles and the registry.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of node a plugin contributes to a workflow.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PluginType {
    Custom,
    Trainer,
    Evaluator,
    Model,
    ModelLayer,
    Dataloader,
    Dataset,
    Preprocessor,
    Postprocessor,
    Augmentation,
    Optimizer,
    LossFunction,
    Metric,
    Scheduler,
    Regularizer,
    Function,
    Pipeline,
    Report,
}

impl PluginType {
    /// Variable providers sit at the head of a pipeline and do not take part
    /// in the `prev`/`next` flow chain.
    pub fn is_variable_provider(self) -> bool {
        matches!(self, PluginType::Dataset | PluginType::Dataloader)
    }
}

/// Value kinds that can travel along a graph edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HandleDataType {
    Any,
    Dataset,
    Dataloader,
    Model,
    ModelLayer,
    Tensor,
    Optimizer,
    LossFunction,
    Metrics,
    Scalar,
    Config,
}

/// Side of the node a handle is drawn on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HandlePosition {
    Left,
    Right,
    Top,
    Bottom,
}

/// Files a plugin owns in the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PluginFileKind {
    /// The bundled plugin code (`index.js`).
    Code,
    /// The plugin manifest (`manifest.json`).
    Manifest,
}

impl PluginFileKind {
    /// Object file name under the slug prefix.
    pub fn file_name(self) -> &'static str {
        match self {
            PluginFileKind::Code => "index.js",
            PluginFileKind::Manifest => "manifest.json",
        }
    }

    /// Content type used when uploading the file.
    pub fn content_type(self) -> &'static str {
        match self {
            PluginFileKind::Code => "application/javascript",
            PluginFileKind::Manifest => "application/json",
        }
    }

    /// Reverse lookup from an object file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "index.js" => Some(PluginFileKind::Code),
            "manifest.json" => Some(PluginFileKind::Manifest),
            _ => None,
        }
    }
}
