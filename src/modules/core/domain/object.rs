//! Write-side data objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A record to be written into a collection, with an optional
/// caller-supplied embedding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataObject {
    /// Target collection (class) name
    #[serde(rename = "class")]
    pub collection: String,

    /// Property map for the object
    pub properties: BTreeMap<String, serde_json::Value>,

    /// Embedding vector; the remote service vectorizes the object itself
    /// when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f64>>,
}

impl DataObject {
    /// Create an empty object for the given collection
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            properties: BTreeMap::new(),
            vector: None,
        }
    }

    /// Set a property
    pub fn with_property(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Attach an embedding vector
    pub fn with_vector(mut self, vector: Vec<f64>) -> Self {
        self.vector = Some(vector);
        self
    }
}
