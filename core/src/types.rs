//! Submission data model: raw input, validated records and field errors.
//!
//! # Design
//! `RawInput` and `ValidatedRecord` share the `FieldValue` enum; what
//! separates them is provenance. A `ValidatedRecord` can only be produced by
//! `validate`, which is why its constructor is crate-private. `FieldErrors`
//! only ever holds fields with at least one message.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

/// An uploaded file as received from the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub content: Bytes,
}

impl FileDescriptor {
    /// Describe `content`, taking its size from the buffer length.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Bytes) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: content.len() as u64,
            content,
        }
    }
}

/// A single form value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(FileDescriptor),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileDescriptor> {
        match self {
            FieldValue::File(file) => Some(file),
            FieldValue::Text(_) => None,
        }
    }
}

/// Decoded, untyped values of one submission, keyed by input name.
///
/// Inserting a name twice keeps the last value, which is what a browser's
/// `multiple` file input collapses to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    fields: BTreeMap<String, FieldValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert(name, FieldValue::Text(value.into()));
    }

    pub fn insert_file(&mut self, name: impl Into<String>, file: FileDescriptor) {
        self.insert(name, FieldValue::File(file));
    }

    /// Builder-style `insert_text`.
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_text(name, value);
        self
    }

    /// Builder-style `insert_file`.
    pub fn with_file(mut self, name: impl Into<String>, file: FileDescriptor) -> Self {
        self.insert_file(name, file);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut input = RawInput::new();
        for (name, value) in iter {
            input.insert(name, value);
        }
        input
    }
}

/// Typed values of a submission in which every field passed its rules.
///
/// Keyed by field name (not input name); text values are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl ValidatedRecord {
    pub(crate) fn new(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn file(&self, name: &str) -> Option<&FileDescriptor> {
        self.get(name).and_then(FieldValue::as_file)
    }

    /// Fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// File fields in name order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileDescriptor)> {
        self.iter()
            .filter_map(|(name, value)| value.as_file().map(|file| (name, file)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Per-field validation messages, in rule-application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .fields.len())]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` to the messages of `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The first message of every failing field, for forms that show one
    /// error per input.
    pub fn first_messages(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|(field, messages)| {
                messages.first().map(|first| (field.clone(), first.clone()))
            })
            .collect()
    }
}
