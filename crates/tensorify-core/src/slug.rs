// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin slugs of the form `@namespace/name:version`.
//!
//! Two grammars are in use and both are kept as written:
//!
//! - [`STRICT_SLUG_PATTERN`] is what manifests, storage keys and the HTTP API
//!   accept: the version must be a dotted numeric triple.
//! - [`TOOL_SLUG_PATTERN`] is what the tool-facing surface accepts: the same
//!   grammar, plus the literal `latest` in place of the version.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TensorifyError;
use crate::types::PluginFileKind;

/// Slug grammar used by manifests, storage and the HTTP API.
pub const STRICT_SLUG_PATTERN: &str = r"^@[a-zA-Z0-9_-]+/[a-zA-Z0-9_-]+:[0-9]+\.[0-9]+\.[0-9]+$";

/// Slug grammar used by the tool-facing surface; also admits `latest`.
pub const TOOL_SLUG_PATTERN: &str =
    r"^@[a-zA-Z0-9_-]+/[a-zA-Z0-9_-]+:([0-9]+\.[0-9]+\.[0-9]+|latest)$";

static STRICT_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STRICT_SLUG_PATTERN).expect("strict slug pattern compiles"));

static TOOL_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOOL_SLUG_PATTERN).expect("tool slug pattern compiles"));

/// Version component of a slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlugVersion {
    /// A `MAJOR.MINOR.PATCH` version, kept exactly as written.
    Exact(String),
    /// The `latest` alias, only produced by [`PluginSlug::parse_tool`].
    Latest,
}

impl fmt::Display for SlugVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugVersion::Exact(v) => f.write_str(v),
            SlugVersion::Latest => f.write_str("latest"),
        }
    }
}

/// A validated `@namespace/name:version` plugin identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginSlug {
    namespace: String,
    name: String,
    version: SlugVersion,
}

impl PluginSlug {
    /// Parses a slug with the strict grammar.
    pub fn parse(raw: &str) -> Result<Self, TensorifyError> {
        if !STRICT_SLUG.is_match(raw) {
            return Err(invalid(raw, describe_mismatch(raw)));
        }
        Ok(split_validated(raw))
    }

    /// Parses a slug with the tool grammar, which also accepts `latest`.
    pub fn parse_tool(raw: &str) -> Result<Self, TensorifyError> {
        if !TOOL_SLUG.is_match(raw) {
            return Err(invalid(raw, describe_mismatch(raw)));
        }
        Ok(split_validated(raw))
    }

    /// Builds a slug from a storage prefix such as `acme/conv2d:1.0.0`.
    /// Stored keys always carry a concrete version.
    pub fn from_storage_prefix(prefix: &str) -> Result<Self, TensorifyError> {
        Self::parse(&format!("@{prefix}"))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &SlugVersion {
        &self.version
    }

    pub fn is_latest(&self) -> bool {
        self.version == SlugVersion::Latest
    }

    /// `@namespace/name`, the package name without a version.
    pub fn package_name(&self) -> String {
        format!("@{}/{}", self.namespace, self.name)
    }

    /// Returns a copy of this slug pinned to an exact version.
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            version: SlugVersion::Exact(version.into()),
        }
    }

    /// Object-store prefix owned by this slug: `namespace/name:version`.
    pub fn storage_prefix(&self) -> String {
        format!("{}/{}:{}", self.namespace, self.name, self.version)
    }

    /// Object key for an arbitrary file under this slug's prefix.
    pub fn object_key(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.storage_prefix())
    }

    /// Object key for one of the two well-known plugin files.
    pub fn file_key(&self, kind: PluginFileKind) -> String {
        self.object_key(kind.file_name())
    }
}

impl fmt::Display for PluginSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}/{}:{}", self.namespace, self.name, self.version)
    }
}

impl FromStr for PluginSlug {
    type Err = TensorifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PluginSlug {
    type Error = TensorifyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PluginSlug> for String {
    fn from(slug: PluginSlug) -> Self {
        slug.to_string()
    }
}

fn invalid(raw: &str, reason: String) -> TensorifyError {
    TensorifyError::InvalidSlug {
        slug: raw.to_string(),
        reason,
    }
}

/// Splits a slug that already matched one of the grammars.
fn split_validated(raw: &str) -> PluginSlug {
    let body = &raw[1..];
    let (namespace, rest) = body.split_once('/').unwrap_or((body, ""));
    let (name, version) = rest.split_once(':').unwrap_or((rest, ""));
    let version = if version == "latest" {
        SlugVersion::Latest
    } else {
        SlugVersion::Exact(version.to_string())
    };
    PluginSlug {
        namespace: namespace.to_string(),
        name: name.to_string(),
        version,
    }
}

/// Best-effort explanation of why a slug was rejected.
fn describe_mismatch(raw: &str) -> String {
    let Some(body) = raw.strip_prefix('@') else {
        return "must start with `@`".to_string();
    };
    let Some((namespace, rest)) = body.split_once('/') else {
        return "expected `@namespace/name:version`".to_string();
    };
    if namespace.is_empty() {
        return "namespace must not be empty".to_string();
    }
    let Some((name, version)) = rest.split_once(':') else {
        return "missing `:version` suffix".to_string();
    };
    if name.is_empty() {
        return "name must not be empty".to_string();
    }
    let charset_ok = |s: &str| {
        s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    };
    if !charset_ok(namespace) || !charset_ok(name) {
        return "namespace and name may only contain letters, digits, `_` and `-`".to_string();
    }
    format!("version `{version}` must be MAJOR.MINOR.PATCH")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_well_formed_slug() {
        let slug = PluginSlug::parse("@acme/conv2d:1.0.0").unwrap();
        assert_eq!(slug.namespace(), "acme");
        assert_eq!(slug.name(), "conv2d");
        assert_eq!(slug.version(), &SlugVersion::Exact("1.0.0".into()));
        assert_eq!(slug.to_string(), "@acme/conv2d:1.0.0");
    }

    #[test]
    fn rejects_missing_at_sign() {
        let err = PluginSlug::parse("acme/conv2d:1.0.0").unwrap_err();
        assert!(err.to_string().contains("must start with `@`"));
    }

    #[test]
    fn rejects_non_numeric_version() {
        let err = PluginSlug::parse("@acme/conv2d:v1").unwrap_err();
        assert!(err.to_string().contains("MAJOR.MINOR.PATCH"));
    }

    #[test]
    fn rejects_empty_namespace() {
        let err = PluginSlug::parse("@/conv2d:1.0.0").unwrap_err();
        assert!(err.to_string().contains("namespace must not be empty"));
    }

    #[test]
    fn strict_grammar_rejects_latest() {
        assert!(PluginSlug::parse("@acme/conv2d:latest").is_err());
    }

    #[test]
    fn tool_grammar_accepts_latest() {
        let slug = PluginSlug::parse_tool("@acme/conv2d:latest").unwrap();
        assert!(slug.is_latest());
        assert_eq!(slug.to_string(), "@acme/conv2d:latest");
        assert!(PluginSlug::parse_tool("@acme/conv2d:v1").is_err());
    }

    #[test]
    fn storage_keys_drop_the_at_sign() {
        let slug = PluginSlug::parse("@acme/conv2d:1.2.3").unwrap();
        assert_eq!(slug.storage_prefix(), "acme/conv2d:1.2.3");
        assert_eq!(
            slug.file_key(PluginFileKind::Code),
            "acme/conv2d:1.2.3/index.js"
        );
        assert_eq!(
            slug.file_key(PluginFileKind::Manifest),
            "acme/conv2d:1.2.3/manifest.json"
        );
    }

    #[test]
    fn storage_prefix_round_trips() {
        let slug = PluginSlug::from_storage_prefix("acme/conv2d:1.2.3").unwrap();
        assert_eq!(slug.to_string(), "@acme/conv2d:1.2.3");
        assert!(PluginSlug::from_storage_prefix("acme/conv2d").is_err());
        assert!(PluginSlug::from_storage_prefix("acme/conv2d:latest").is_err());
    }

    #[test]
    fn serde_uses_the_strict_grammar() {
        let slug: PluginSlug = serde_json::from_str("\"@acme/conv2d:1.0.0\"").unwrap();
        assert_eq!(serde_json::to_string(&slug).unwrap(), "\"@acme/conv2d:1.0.0\"");
        assert!(serde_json::from_str::<PluginSlug>("\"@acme/conv2d:latest\"").is_err());
    }

    proptest! {
        #[test]
        fn generated_slugs_parse_and_display_identically(
            ns in "[a-zA-Z0-9_-]{1,12}",
            name in "[a-zA-Z0-9_-]{1,12}",
            major in 0u32..100,
            minor in 0u32..100,
            patch in 0u32..100,
        ) {
            let raw = format!("@{ns}/{name}:{major}.{minor}.{patch}");
            let slug = PluginSlug::parse(&raw).unwrap();
            prop_assert_eq!(slug.to_string(), raw);
            prop_assert_eq!(slug.namespace(), ns.as_str());
        }

        #[test]
        fn namespaces_with_other_characters_are_rejected(
            ns in "[a-z]{0,4}[./ @:][a-z]{0,4}",
        ) {
            let raw = format!("@{ns}/conv2d:1.0.0");
            prop_assert!(PluginSlug::parse(&raw).is_err());
        }
    }
}
