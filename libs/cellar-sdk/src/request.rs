//! Typed request envelope produced by the host's dispatch layer.
//!
//! The host parses and schema-validates raw client input before a
//! plugin sees it; what reaches the plugin is an [`Operation`], a path,
//! and a [`FieldData`] map of validated fields.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::lease::Lease;

/// Logical operation on a plugin path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Read data at a path
    Read,
    /// Create a record the host determined to be absent
    Create,
    /// Update a record the host determined to exist
    Update,
    /// Delete a record
    Delete,
    /// List keys under a path
    List,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
        };
        f.write_str(name)
    }
}

/// A field was present but carried the wrong type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field {field} is not {expected}")]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Description of the expected type
    pub expected: &'static str,
}

/// Schema-validated fields attached to a request.
///
/// Getters distinguish an absent field (`Ok(None)`) from a present field
/// of the wrong type (`Err`), so plugins can merge partial updates
/// without guessing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldData {
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl FieldData {
    /// Wrap a field map.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// True when no fields were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when `name` was supplied.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get a string field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is present but not a string.
    pub fn get_str(&self, name: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or_else(|| FieldError {
                field: name.to_string(),
                expected: "a string",
            }),
        }
    }

    /// Get an unsigned integer field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is present but not an unsigned
    /// integer.
    pub fn get_u64(&self, name: &str) -> Result<Option<u64>, FieldError> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| FieldError {
                field: name.to_string(),
                expected: "an unsigned integer",
            }),
        }
    }

    /// Get a duration field expressed in whole seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is present but not an unsigned
    /// number of seconds.
    pub fn get_duration_secs(&self, name: &str) -> Result<Option<Duration>, FieldError> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .map(|secs| Some(Duration::from_secs(secs)))
                .ok_or_else(|| FieldError {
                    field: name.to_string(),
                    expected: "a duration in seconds",
                }),
        }
    }
}

/// A dispatched plugin request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Operation to perform
    pub operation: Operation,
    /// Plugin-relative path, e.g. `role/barista`
    pub path: String,
    /// Schema-validated fields
    #[serde(default)]
    pub fields: FieldData,
}

impl Request {
    /// Create a request.
    #[must_use]
    pub fn new(operation: Operation, path: impl Into<String>, fields: FieldData) -> Self {
        Self {
            operation,
            path: path.into(),
            fields,
        }
    }
}

/// Plugin response envelope.
///
/// A response with neither data nor lease is the "absent" result: the
/// host renders it as not-found on read paths and as plain success on
/// write paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Response data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    /// Lease-bound secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease: Option<Lease>,
}

impl Response {
    /// An empty response.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A response carrying data.
    #[must_use]
    pub fn with_data(data: Map<String, Value>) -> Self {
        Self {
            data: Some(data),
            lease: None,
        }
    }

    /// A list response carrying key names under `keys`.
    #[must_use]
    pub fn with_keys(keys: Vec<String>) -> Self {
        let mut data = Map::new();
        data.insert("keys".to_string(), Value::from(keys));
        Self::with_data(data)
    }

    /// A response carrying a lease-bound secret.
    ///
    /// The lease's public data is mirrored into the response data, which
    /// is what the caller ultimately sees.
    #[must_use]
    pub fn with_lease(lease: Lease) -> Self {
        Self {
            data: Some(lease.data.clone()),
            lease: Some(lease),
        }
    }
}
