// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Python source rendering.
//!
//! Literal rules: booleans become `True`/`False`, null becomes `None`,
//! numbers keep their JSON form, and strings are quoted unless they are a
//! bare identifier, which is emitted as a variable reference. Lists and
//! dicts apply the same rules recursively; dict keys are always quoted.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

const INDENT: &str = "    ";

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("identifier pattern compiles")
});

/// Whether `s` can be emitted unquoted as a (possibly dotted) name.
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// Quotes `s` as a Python string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Renders a JSON value as a Python expression.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if is_identifier(s) => s.clone(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), literal(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

/// Renders `items` as a Python tuple, keeping the trailing comma of a
/// one-element tuple.
pub fn tuple(items: &[Value]) -> String {
    let inner: Vec<String> = items.iter().map(literal).collect();
    match inner.as_slice() {
        [single] => format!("({single},)"),
        _ => format!("({})", inner.join(", ")),
    }
}

/// Builder for a multi-line call expression.
///
/// ```text
/// callee(
///     positional,
///     key=value
/// )
/// ```
#[derive(Debug, Clone)]
pub struct PyCall {
    callee: String,
    args: Vec<String>,
}

impl PyCall {
    pub fn new(callee: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
            args: Vec::new(),
        }
    }

    /// Adds a positional argument, already rendered.
    pub fn arg(mut self, expr: impl Into<String>) -> Self {
        self.args.push(expr.into());
        self
    }

    /// Adds `key=expr` with `expr` already rendered.
    pub fn kwarg(mut self, key: &str, expr: impl AsRef<str>) -> Self {
        self.args.push(format!("{key}={}", expr.as_ref()));
        self
    }

    /// Adds `key=literal(value)`.
    pub fn kwarg_value(self, key: &str, value: &Value) -> Self {
        let rendered = literal(value);
        self.kwarg(key, rendered)
    }

    /// Adds `key=literal(value)` only when `value` differs from the target
    /// library's default.
    pub fn kwarg_unless_default(self, key: &str, value: &Value, library_default: &Value) -> Self {
        if same_value(value, library_default) {
            self
        } else {
            self.kwarg_value(key, value)
        }
    }

    pub fn render(&self) -> String {
        if self.args.is_empty() {
            return format!("{}()", self.callee);
        }
        let body: Vec<String> = self
            .args
            .iter()
            .map(|a| indent(a, 1))
            .collect();
        format!("{}(\n{}\n)", self.callee, body.join(",\n"))
    }

    /// Renders `name = callee(...)`.
    pub fn assign_to(&self, name: &str) -> String {
        format!("{name} = {}", self.render())
    }
}

/// Value equality where `0` and `0.0` are the same number.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Indents every line of `code` by `depth` levels.
pub fn indent(code: &str, depth: usize) -> String {
    let pad = INDENT.repeat(depth);
    code.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefixes `expr` with `name = ` when a binding is active.
pub fn bind(name: Option<&str>, expr: String) -> String {
    match name {
        Some(name) => format!("{name} = {expr}"),
        None => expr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn scalars_render_as_python() {
        assert_eq!(literal(&json!(true)), "True");
        assert_eq!(literal(&json!(false)), "False");
        assert_eq!(literal(&Value::Null), "None");
        assert_eq!(literal(&json!(32)), "32");
        assert_eq!(literal(&json!(0.001)), "0.001");
    }

    #[test]
    fn strings_are_quoted_unless_identifiers() {
        assert_eq!(literal(&json!("dataset")), "dataset");
        assert_eq!(literal(&json!("torch.float32")), "torch.float32");
        assert_eq!(literal(&json!("./data")), "\"./data\"");
        assert_eq!(literal(&json!("two words")), "\"two words\"");
        assert_eq!(literal(&json!("say \"hi\"")), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn collections_render_recursively() {
        assert_eq!(literal(&json!([1, true, null])), "[1, True, None]");
        assert_eq!(
            literal(&json!({ "lr": 0.1, "nested": [false] })),
            "{\"lr\": 0.1, \"nested\": [False]}"
        );
    }

    #[test]
    fn tuples_keep_single_element_comma() {
        assert_eq!(tuple(&[json!(3)]), "(3,)");
        assert_eq!(tuple(&[json!(0.9), json!(0.999)]), "(0.9, 0.999)");
    }

    #[test]
    fn calls_render_one_argument_per_line() {
        let call = PyCall::new("nn.Linear")
            .arg("128")
            .kwarg_value("out_features", &json!(10));
        assert_eq!(call.render(), "nn.Linear(\n    128,\n    out_features=10\n)");
        assert_eq!(PyCall::new("nn.ReLU").render(), "nn.ReLU()");
    }

    #[test]
    fn defaults_are_omitted() {
        let call = PyCall::new("f")
            .kwarg_unless_default("shuffle", &json!(false), &json!(false))
            .kwarg_unless_default("bias", &json!(false), &json!(true))
            .kwarg_unless_default("weight_decay", &json!(0.0), &json!(0));
        assert_eq!(call.render(), "f(\n    bias=False\n)");
    }

    #[test]
    fn nested_calls_are_indented() {
        let inner = PyCall::new("g").kwarg("x", "1").render();
        let outer = PyCall::new("f").arg(inner).render();
        assert_eq!(outer, "f(\n    g(\n        x=1\n    )\n)");
    }

    #[test]
    fn bind_prefixes_assignment() {
        assert_eq!(bind(Some("model"), "f()".into()), "model = f()");
        assert_eq!(bind(None, "f()".into()), "f()");
    }

    proptest! {
        #[test]
        fn quoted_strings_never_leak_raw_quotes(s in ".*") {
            let quoted = quote(&s);
            let body = &quoted[1..quoted.len() - 1];
            let mut chars = body.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    prop_assert!(chars.next().is_some());
                } else {
                    prop_assert_ne!(c, '"');
                    prop_assert_ne!(c, '\n');
                }
            }
        }

        #[test]
        fn rendering_is_deterministic(n in any::<i64>(), b in any::<bool>(), s in "[a-z ]{0,12}") {
            let value = json!({ "n": n, "b": b, "s": s, "l": [n, b] });
            prop_assert_eq!(literal(&value), literal(&value.clone()));
        }
    }
}
