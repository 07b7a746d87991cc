//! core::record
//!
//! Schemaless entity backed by a JSON object.
//!
//! The CLI manages pages whose entity shape is only known to the remote
//! resource. [`Record`] keeps every field as JSON, reads its id from the
//! `id` field (string or number), and exposes the `subList` array as its
//! nested child collection.
//!
//! # Example
//!
//! ```
//! use pagestore::core::record::Record;
//! use pagestore::core::types::Entity;
//!
//! let record: Record = serde_json::from_str(
//!     r#"{ "id": 7, "name": "kim", "subList": [{ "id": "a" }, { "memo": "draft" }] }"#,
//! ).unwrap();
//!
//! assert_eq!(record.id().as_deref(), Some("7"));
//! assert_eq!(record.children().len(), 2);
//! assert!(record.without_children().get("subList").is_none());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::Entity;

/// Field holding a record's id.
pub const RECORD_ID_FIELD: &str = "id";

/// Field holding a record's nested child collection.
pub const RECORD_CHILDREN_FIELD: &str = "subList";

/// A JSON object entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Remove a field.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Iterate over the fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(format!("expected a JSON object, got {other}")),
        }
    }
}

impl Entity for Record {
    type Child = Record;

    fn id(&self) -> Option<String> {
        match self.0.get(RECORD_ID_FIELD)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn children(&self) -> Vec<Record> {
        match self.0.get(RECORD_CHILDREN_FIELD) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| Record::try_from(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    fn without_children(&self) -> Self {
        let mut copy = self.clone();
        copy.0.shift_remove(RECORD_CHILDREN_FIELD);
        copy
    }
}
