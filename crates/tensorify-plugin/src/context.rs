// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation context handed to templates alongside validated settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upstream bindings and child snippets for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationContext {
    /// Variable bound to each connected input handle. `None` means the
    /// handle is connected but the upstream node exposes no variable.
    #[serde(default)]
    pub inputs: BTreeMap<String, Option<String>>,
    /// Rendered code of nested nodes, in order, for container plugins.
    #[serde(default)]
    pub children: Vec<String>,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, handle: impl Into<String>, variable: impl Into<String>) -> Self {
        self.inputs.insert(handle.into(), Some(variable.into()));
        self
    }

    pub fn with_unbound_input(mut self, handle: impl Into<String>) -> Self {
        self.inputs.insert(handle.into(), None);
        self
    }

    pub fn with_child(mut self, code: impl Into<String>) -> Self {
        self.children.push(code.into());
        self
    }

    /// Variable bound to `handle`, if any.
    pub fn upstream_variable(&self, handle: &str) -> Option<&str> {
        self.inputs.get(handle)?.as_deref()
    }

    /// Variable bound to `handle`, or `fallback` when nothing is bound.
    ///
    /// The fallback keeps generated code readable for partially wired
    /// graphs, but it may reference a name that is never assigned.
    pub fn variable_or<'a>(&'a self, handle: &str, fallback: &'a str) -> &'a str {
        match self.upstream_variable(handle) {
            Some(var) => var,
            None => {
                debug!(handle, fallback, "no upstream variable bound, using fallback name");
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn bound_inputs_win_over_fallback() {
        let ctx = TranslationContext::new().with_input("dataset", "train_ds");
        assert_eq!(ctx.variable_or("dataset", "dataset"), "train_ds");
    }

    #[test]
    fn unbound_and_missing_inputs_fall_back() {
        let ctx = TranslationContext::new().with_unbound_input("model");
        assert_eq!(ctx.upstream_variable("model"), None);
        assert_eq!(ctx.variable_or("model", "model"), "model");
        assert_eq!(ctx.variable_or("optimizer", "optimizer"), "optimizer");
    }

    #[traced_test]
    #[test]
    fn fallback_emits_debug_event() {
        let ctx = TranslationContext::new();
        ctx.variable_or("dataset", "dataset");
        assert!(logs_contain("no upstream variable bound"));
    }

    #[test]
    fn deserializes_with_missing_sections() {
        let ctx: TranslationContext = serde_json::from_str(r#"{"inputs":{"prev":null}}"#).unwrap();
        assert_eq!(ctx.inputs.get("prev"), Some(&None));
        assert!(ctx.children.is_empty());
    }
}
