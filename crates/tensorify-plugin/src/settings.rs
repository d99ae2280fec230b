// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings validation.
//!
//! Raw settings arrive as an untyped JSON object. [`validate_settings`]
//! checks them against a manifest's settings fields once, at the boundary,
//! and produces a [`ValidatedSettings`] map that templates can read without
//! re-checking types. Keys that no field declares are dropped.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::{Map, Number, Value};

use tensorify_core::{FieldViolation, TensorifyError};

use crate::manifest::{SettingsDataType, SettingsField};

/// A settings value whose JSON type matched its field's `dataType`.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<Value>),
    Object(Map<String, Value>),
}

impl SettingValue {
    pub fn to_value(&self) -> Value {
        match self {
            SettingValue::Bool(b) => Value::Bool(*b),
            SettingValue::Number(n) => Value::Number(n.clone()),
            SettingValue::Text(s) => Value::String(s.clone()),
            SettingValue::List(items) => Value::Array(items.clone()),
            SettingValue::Object(map) => Value::Object(map.clone()),
        }
    }
}

/// Settings that passed validation, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedSettings {
    values: BTreeMap<String, SettingValue>,
}

impl ValidatedSettings {
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key)? {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Boolean value, `false` when absent.
    pub fn flag(&self, key: &str) -> bool {
        self.bool(key).unwrap_or(false)
    }

    pub fn number(&self, key: &str) -> Option<&Number> {
        match self.values.get(key)? {
            SettingValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn u64(&self, key: &str) -> Option<u64> {
        self.number(key)?.as_u64()
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        self.number(key)?.as_f64()
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text value, `None` when absent or empty.
    pub fn opt_text(&self, key: &str) -> Option<&str> {
        self.text(key).filter(|s| !s.trim().is_empty())
    }

    pub fn list(&self, key: &str) -> Option<&[Value]> {
        match self.values.get(key)? {
            SettingValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The settings as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }
}

/// Validates `raw` against `fields`, collecting every violation.
pub fn validate_settings(
    fields: &[SettingsField],
    raw: &Map<String, Value>,
) -> Result<ValidatedSettings, TensorifyError> {
    let mut values = BTreeMap::new();
    let mut violations = Vec::new();

    for field in fields {
        let supplied = raw.get(&field.key).filter(|v| !v.is_null());
        let Some(value) = supplied.or(field.default_value.as_ref().filter(|v| !v.is_null())) else {
            if field.required {
                violations.push(FieldViolation::new(&field.key, "is required"));
            }
            continue;
        };

        match check_field(field, value) {
            Ok(checked) => {
                values.insert(field.key.clone(), checked);
            }
            Err(mut errs) => violations.append(&mut errs),
        }
    }

    if violations.is_empty() {
        Ok(ValidatedSettings { values })
    } else {
        Err(TensorifyError::InvalidSettings { violations })
    }
}

fn check_field(field: &SettingsField, value: &Value) -> Result<SettingValue, Vec<FieldViolation>> {
    let key = field.key.as_str();
    let violation = |message: String| FieldViolation::new(key, message);

    let mut typed = match (field.data_type, value) {
        (SettingsDataType::Boolean, Value::Bool(b)) => SettingValue::Bool(*b),
        (SettingsDataType::Number, Value::Number(n)) => SettingValue::Number(n.clone()),
        (SettingsDataType::String, Value::String(s)) => SettingValue::Text(s.clone()),
        (SettingsDataType::Array, Value::Array(items)) => SettingValue::List(items.clone()),
        (SettingsDataType::Object, Value::Object(map)) => SettingValue::Object(map.clone()),
        (expected, other) => {
            return Err(vec![violation(format!(
                "expected {expected}, found {}",
                json_type_name(other)
            ))]);
        }
    };

    let mut violations = Vec::new();

    if let Some(rules) = &field.validation {
        match &typed {
            SettingValue::Number(number) => {
                let n = number.as_f64().unwrap_or(f64::NAN);
                if rules.integer && !(number.is_u64() || number.is_i64()) {
                    match whole_number(n) {
                        Some(whole) => typed = SettingValue::Number(whole),
                        None => violations.push(violation("must be a whole number".to_string())),
                    }
                }
                if let Some(min) = rules.min
                    && n < min
                {
                    violations.push(violation(format!("must be at least {min}")));
                }
                if let Some(max) = rules.max
                    && n > max
                {
                    violations.push(violation(format!("must be at most {max}")));
                }
            }
            SettingValue::Text(s) => {
                let len = s.chars().count() as u64;
                check_length(len, rules.min_length, rules.max_length, "characters", &mut |m| {
                    violations.push(violation(m))
                });
                if let Some(pattern) = &rules.pattern {
                    match Regex::new(pattern) {
                        Ok(re) if !re.is_match(s) => {
                            violations.push(violation(format!("must match pattern `{pattern}`")));
                        }
                        Ok(_) => {}
                        Err(_) => {
                            violations.push(violation(format!("declares an invalid pattern `{pattern}`")));
                        }
                    }
                }
            }
            SettingValue::List(items) => {
                check_length(items.len() as u64, rules.min_length, rules.max_length, "items", &mut |m| {
                    violations.push(violation(m))
                });
            }
            SettingValue::Bool(_) | SettingValue::Object(_) => {}
        }
    }

    if !field.options.is_empty() {
        let allowed = |candidate: &Value| field.options.iter().any(|o| &o.value == candidate);
        let offending: Vec<&Value> = match value {
            Value::Array(items) => items.iter().filter(|v| !allowed(v)).collect(),
            other if !allowed(other) => vec![other],
            _ => Vec::new(),
        };
        if !offending.is_empty() {
            let choices = field
                .options
                .iter()
                .map(|o| o.value.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            violations.push(violation(format!("must be one of: {choices}")));
        }
    }

    if violations.is_empty() {
        Ok(typed)
    } else {
        Err(violations)
    }
}

/// `n` as an integer JSON number when it has no fractional part.
fn whole_number(n: f64) -> Option<Number> {
    if !n.is_finite() || n.fract() != 0.0 {
        return None;
    }
    if n >= 0.0 && n <= u64::MAX as f64 {
        Some(Number::from(n as u64))
    } else if n >= i64::MIN as f64 {
        Some(Number::from(n as i64))
    } else {
        None
    }
}

fn check_length(
    len: u64,
    min: Option<u64>,
    max: Option<u64>,
    unit: &str,
    report: &mut dyn FnMut(String),
) {
    if let Some(min) = min
        && len < min
    {
        report(format!("must have at least {min} {unit}"));
    }
    if let Some(max) = max
        && len > max
    {
        report(format!("must have at most {max} {unit}"));
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{FieldValidation, SettingsFieldType};
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn loader_fields() -> Vec<SettingsField> {
        vec![
            SettingsField::number("batch_size", "Batch size", 32)
                .with_range(Some(1.0), Some(4096.0))
                .required(),
            SettingsField::toggle("shuffle", "Shuffle", true),
            SettingsField::number("num_workers", "Workers", 0).with_range(Some(0.0), Some(32.0)),
        ]
    }

    #[test]
    fn defaults_fill_absent_and_null_values() {
        let settings = validate_settings(&loader_fields(), &obj(json!({ "shuffle": null }))).unwrap();
        assert_eq!(settings.u64("batch_size"), Some(32));
        assert_eq!(settings.bool("shuffle"), Some(true));
        assert_eq!(settings.u64("num_workers"), Some(0));
    }

    #[test]
    fn out_of_range_numbers_are_all_reported() {
        let err = validate_settings(
            &loader_fields(),
            &obj(json!({ "batch_size": 0, "num_workers": 33 })),
        )
        .unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].to_string(), "batch_size: must be at least 1");
        assert_eq!(violations[1].to_string(), "num_workers: must be at most 32");
    }

    #[test]
    fn type_mismatch_names_expected_and_found() {
        let err = validate_settings(&loader_fields(), &obj(json!({ "batch_size": "32" }))).unwrap_err();
        assert_eq!(
            err.violations()[0].message,
            "expected NUMBER, found string"
        );
    }

    #[test]
    fn required_without_default_is_a_violation() {
        let fields = vec![
            SettingsField::new("in_features", "In", SettingsFieldType::InputNumber, SettingsDataType::Number)
                .required(),
        ];
        let err = validate_settings(&fields, &Map::new()).unwrap_err();
        assert_eq!(err.violations()[0].to_string(), "in_features: is required");
    }

    #[test]
    fn optional_without_default_is_simply_absent() {
        let fields = vec![SettingsField::new(
            "note",
            "Note",
            SettingsFieldType::InputText,
            SettingsDataType::String,
        )];
        let settings = validate_settings(&fields, &Map::new()).unwrap();
        assert!(!settings.contains("note"));
        assert!(settings.is_empty());
    }

    #[test]
    fn undeclared_keys_are_dropped() {
        let settings = validate_settings(
            &loader_fields(),
            &obj(json!({ "__import__": "os", "batch_size": 8 })),
        )
        .unwrap();
        assert!(settings.get("__import__").is_none());
        assert_eq!(settings.len(), 3);
    }

    #[test]
    fn options_restrict_values() {
        let fields = vec![SettingsField::text("activation", "Activation", "relu")
            .with_options(["relu", "tanh"])];
        assert!(validate_settings(&fields, &obj(json!({ "activation": "tanh" }))).is_ok());
        let err = validate_settings(&fields, &obj(json!({ "activation": "gelu" }))).unwrap_err();
        assert!(err.violations()[0].message.starts_with("must be one of:"));
    }

    #[test]
    fn multi_select_checks_every_item() {
        let fields = vec![
            SettingsField::new("metrics", "Metrics", SettingsFieldType::MultiSelect, SettingsDataType::Array)
                .with_options(["accuracy", "f1"]),
        ];
        assert!(validate_settings(&fields, &obj(json!({ "metrics": ["f1"] }))).is_ok());
        assert!(validate_settings(&fields, &obj(json!({ "metrics": ["f1", "auc"] }))).is_err());
    }

    #[test]
    fn string_length_and_pattern_rules() {
        let mut field = SettingsField::text("name", "Name", "model");
        field.validation = Some(FieldValidation {
            min_length: Some(2),
            max_length: Some(8),
            pattern: Some("^[a-z_]+$".into()),
            ..FieldValidation::default()
        });
        let fields = vec![field];
        assert!(validate_settings(&fields, &obj(json!({ "name": "net" }))).is_ok());

        let err = validate_settings(&fields, &obj(json!({ "name": "X" }))).unwrap_err();
        let messages: Vec<&str> = err.violations().iter().map(|v| v.message.as_str()).collect();
        assert!(messages.contains(&"must have at least 2 characters"));
        assert!(messages.iter().any(|m| m.starts_with("must match pattern")));
    }

    #[test]
    fn whole_number_fields_accept_integral_floats() {
        let fields = vec![SettingsField::number("epochs", "Epochs", 10).with_range(Some(1.0), None).whole()];
        let settings = validate_settings(&fields, &obj(json!({ "epochs": 20.0 }))).unwrap();
        assert_eq!(settings.u64("epochs"), Some(20));
        assert_eq!(settings.to_value(), json!({ "epochs": 20 }));

        let err = validate_settings(&fields, &obj(json!({ "epochs": 2.5 }))).unwrap_err();
        assert_eq!(err.violations()[0].message, "must be a whole number");
    }

    #[test]
    fn array_length_rules() {
        let mut field = SettingsField::new("shape", "Shape", SettingsFieldType::CodeEditor, SettingsDataType::Array);
        field.validation = Some(FieldValidation {
            max_length: Some(2),
            ..FieldValidation::default()
        });
        let err = validate_settings(&[field], &obj(json!({ "shape": [1, 2, 3] }))).unwrap_err();
        assert_eq!(err.violations()[0].message, "must have at most 2 items");
    }

    #[test]
    fn to_value_round_trips_validated_settings() {
        let settings = validate_settings(&loader_fields(), &obj(json!({ "batch_size": 64 }))).unwrap();
        assert_eq!(
            settings.to_value(),
            json!({ "batch_size": 64, "num_workers": 0, "shuffle": true })
        );
    }
}
