//! Generic response document
//!
//! Every put.io endpoint answers with a JSON object. Rather than mirroring
//! each response in a struct, callers query the decoded tree by field path.
//! Every accessor returns `None` when a field is missing or has the wrong
//! type, so the caller decides whether to default and continue or to abort.

use serde::Serialize;
use serde_json::Value;

use crate::api::STATUS_ERROR;
use crate::error::{PioError, Result};

/// Decoded JSON response queried by field path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    value: Value,
}

impl Document {
    /// Wrap an already decoded value
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Decode a response body
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value = serde_json::from_slice(bytes)?;
        Ok(Self { value })
    }

    /// Borrow the underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Consume the document and return the underlying JSON value
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Top-level `status` field
    pub fn status(&self) -> Option<&str> {
        self.get_str(&["status"])
    }

    /// True when the API flagged the whole call as failed
    pub fn is_error(&self) -> bool {
        self.status() == Some(STATUS_ERROR)
    }

    /// Human readable reason attached to an error response
    pub fn error_message(&self) -> Option<&str> {
        self.get_str(&["error_message"])
            .or_else(|| self.get_str(&["error_type"]))
    }

    /// Walk `path` through nested objects
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.value, |node, key| node.as_object()?.get(*key))
    }

    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.lookup(path)?.as_str()
    }

    pub fn get_i64(&self, path: &[&str]) -> Option<i64> {
        self.lookup(path)?.as_i64()
    }

    /// Unsigned integer field. Negative numbers count as absent.
    pub fn get_u64(&self, path: &[&str]) -> Option<u64> {
        self.lookup(path)?.as_u64()
    }

    /// Floating point field. Integers are widened.
    pub fn get_f64(&self, path: &[&str]) -> Option<f64> {
        self.lookup(path)?.as_f64()
    }

    /// Array of objects at `path`; non-object items are skipped.
    pub fn get_object_array(&self, path: &[&str]) -> Option<Vec<Document>> {
        let items = self.lookup(path)?.as_array()?;
        Some(
            items
                .iter()
                .filter(|item| item.is_object())
                .cloned()
                .map(Document::new)
                .collect(),
        )
    }

    /// Field names of the top-level object, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .value
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl TryFrom<&str> for Document {
    type Error = PioError;

    fn try_from(text: &str) -> Result<Self> {
        Self::from_slice(text.as_bytes())
    }
}
