use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value captured by one wizard input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Answers collected by a single wizard run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    fields: BTreeMap<String, FieldValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn merge(&mut self, other: FormData) {
        self.fields.extend(other.fields);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    /// Trimmed text value, or `""` when the field is missing or not text.
    pub fn text(&self, field: &str) -> &str {
        self.get(field)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .unwrap_or_default()
    }

    /// Text value exactly as entered. Secrets are read this way so surrounding spaces survive.
    pub fn raw_text(&self, field: &str) -> &str {
        self.get(field)
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
    }

    pub fn list(&self, field: &str) -> &[String] {
        self.get(field)
            .and_then(FieldValue::as_list)
            .unwrap_or_default()
    }

    pub fn flag(&self, field: &str) -> bool {
        self.get(field)
            .and_then(FieldValue::as_flag)
            .unwrap_or(false)
    }

    /// Adds or removes `option` from a multi-select list, returning whether it is now present.
    pub fn toggle_in_list(&mut self, field: &str, option: &str) -> bool {
        let entry = self
            .fields
            .entry(field.to_string())
            .or_insert_with(|| FieldValue::List(Vec::new()));
        if !matches!(entry, FieldValue::List(_)) {
            *entry = FieldValue::List(Vec::new());
        }

        let FieldValue::List(values) = entry else {
            return false;
        };
        if let Some(position) = values.iter().position(|value| value == option) {
            values.remove(position);
            false
        } else {
            values.push(option.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
