//! Tabular query results
//!
//! The response envelope from the vector database nests per-object property
//! maps; this module flattens them into a uniform row/column table so every
//! caller sees the same flat shape regardless of the collection's schema.

use magicchat_types::PropertyValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::MagicChatError;

/// An ordered, immutable set of result rows.
///
/// Rows are flat mappings from column name to scalar value; nested
/// sub-objects are flattened into dotted column names (`_additional.score`).
/// An empty table is the explicit "no matches" marker — callers never see
/// `None` standing in for zero rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTable {
    columns: Vec<String>,
    rows: Vec<HashMap<String, PropertyValue>>,
}

impl QueryTable {
    /// The explicit empty result
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Build a table from raw result objects, flattening nested maps.
    ///
    /// The column set is the union of flattened keys across all rows in
    /// order of first appearance (the first row's shape leads); rows
    /// missing a column are filled with an explicit null.
    pub fn from_objects(objects: &[serde_json::Value]) -> Result<Self, MagicChatError> {
        let mut columns: Vec<String> = Vec::new();
        let mut rows: Vec<HashMap<String, PropertyValue>> = Vec::with_capacity(objects.len());

        for object in objects {
            let map = object.as_object().ok_or_else(|| {
                MagicChatError::Normalization(format!(
                    "Expected a result object, got: {}",
                    object
                ))
            })?;

            let mut row = HashMap::new();
            flatten_into(&mut row, &mut columns, "", map);
            rows.push(row);
        }

        // Uniform shape: every row carries every column
        for row in &mut rows {
            for column in &columns {
                row.entry(column.clone()).or_insert(PropertyValue::Null);
            }
        }

        Ok(Self { columns, rows })
    }

    /// Returns true if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of result rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Column names in table order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Result rows in ranked order
    pub fn rows(&self) -> &[HashMap<String, PropertyValue>] {
        &self.rows
    }

    /// The value at (row, column), if present
    pub fn get(&self, row: usize, column: &str) -> Option<&PropertyValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Convert rows into JSON maps for transport
    pub fn to_json_rows(&self) -> Vec<HashMap<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(column, value)| (column.clone(), value.to_json()))
                    .collect()
            })
            .collect()
    }
}

fn flatten_into(
    row: &mut HashMap<String, PropertyValue>,
    columns: &mut Vec<String>,
    prefix: &str,
    map: &serde_json::Map<String, serde_json::Value>,
) {
    for (key, value) in map {
        let column = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_json::Value::Object(nested) => {
                flatten_into(row, columns, &column, nested);
            }
            other => {
                // Sequences other than numeric vectors are carried as
                // their JSON text; the closed scalar set has no seat for
                // them and dropping data would be worse
                let cell = PropertyValue::from_json(other)
                    .unwrap_or_else(|| PropertyValue::Text(other.to_string()));
                if !columns.iter().any(|c| c == &column) {
                    columns.push(column.clone());
                }
                row.insert(column, cell);
            }
        }
    }
}
