//! Load command implementation
//!
//! Seeds a collection from a JSON file of records. A record's `vector` (or
//! `embedding`) field, when present, is sent as the object's embedding; all
//! other fields become properties. Vectorization of records without an
//! embedding happens on the remote side.

use clap::Args;
use std::fs;
use tracing::info;

use magicchat_core::{DataObject, MagicChatError};
use magicchat_parser::parse_file;
use magicchat_runtime::{BatchWriter, WeaviateConnection};

/// Load command arguments
#[derive(Args, Debug)]
pub struct LoadCommand {
    /// Path to a JSON file containing an array of records
    pub file: String,

    /// Target collection (defaults to the configured search collection)
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Drop and recreate the collection before loading
    #[arg(long)]
    pub recreate: bool,
}

impl LoadCommand {
    /// Execute the load command
    pub async fn execute(&self, config_path: &str) -> Result<(), MagicChatError> {
        let model = parse_file(config_path)?;
        let collection = self
            .collection
            .clone()
            .unwrap_or_else(|| model.search.collection.clone());

        let objects = self.read_records(&collection)?;
        info!("Loaded {} records from {}", objects.len(), self.file);

        let connection = WeaviateConnection::connect(model.connection.clone()).await?;
        let writer = BatchWriter::new(connection.client());

        if self.recreate && connection.client().collection_exists(&collection).await? {
            writer.delete_collection(&collection).await?;
        }
        writer.ensure_collection(&collection).await?;

        let written = writer.write(objects).await?;
        println!("Wrote {} objects into {}", written, collection);

        connection.close().await?;
        Ok(())
    }

    /// Parse the input file into batch objects
    fn read_records(&self, collection: &str) -> Result<Vec<DataObject>, MagicChatError> {
        let content = fs::read_to_string(&self.file).map_err(|e| {
            MagicChatError::Configuration(format!("Failed to read '{}': {}", self.file, e))
        })?;

        let records: Vec<serde_json::Value> = serde_json::from_str(&content).map_err(|e| {
            MagicChatError::Validation(format!("'{}' is not a JSON array of records: {}", self.file, e))
        })?;

        let mut objects = Vec::with_capacity(records.len());
        for record in records {
            let serde_json::Value::Object(mut fields) = record else {
                return Err(MagicChatError::Validation(format!(
                    "'{}' contains a non-object record",
                    self.file
                )));
            };

            let vector = fields
                .remove("vector")
                .or_else(|| fields.remove("embedding"))
                .map(|value| parse_vector(&value))
                .transpose()?;

            let mut object = DataObject::new(collection);
            for (name, value) in fields {
                object = object.with_property(name, value);
            }
            if let Some(vector) = vector {
                object = object.with_vector(vector);
            }
            objects.push(object);
        }

        Ok(objects)
    }
}

fn parse_vector(value: &serde_json::Value) -> Result<Vec<f64>, MagicChatError> {
    let items = value.as_array().ok_or_else(|| {
        MagicChatError::Validation("Record vector must be an array of numbers".to_string())
    })?;
    items
        .iter()
        .map(|item| {
            item.as_f64().ok_or_else(|| {
                MagicChatError::Validation("Record vector must contain only numbers".to_string())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_records(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn command_for(file: &tempfile::NamedTempFile) -> LoadCommand {
        LoadCommand {
            file: file.path().to_string_lossy().to_string(),
            collection: None,
            recreate: false,
        }
    }

    #[test]
    fn test_read_records_with_embeddings() {
        let file = write_records(
            r#"[
                {"title": "Animaniacs", "creator": "Tom Ruegger", "embedding": [0.1, 0.2, 0.3, 0.4, 0.5]},
                {"title": "Rugrats", "creator": "Arlene Klasky and Gábor Csupó", "vector": [0.5, 0.4, 0.3, 0.2, 0.1]}
            ]"#,
        );

        let objects = command_for(&file).read_records("TVShow").unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].collection, "TVShow");
        assert_eq!(objects[0].vector.as_deref(), Some(&[0.1, 0.2, 0.3, 0.4, 0.5][..]));
        assert!(objects[0].properties.contains_key("title"));
        // The embedding field never leaks into properties
        assert!(!objects[0].properties.contains_key("embedding"));
        assert_eq!(objects[1].vector.as_deref(), Some(&[0.5, 0.4, 0.3, 0.2, 0.1][..]));
    }

    #[test]
    fn test_read_records_without_vectors() {
        let file = write_records(r#"[{"title": "Doug"}]"#);
        let objects = command_for(&file).read_records("TVShow").unwrap();
        assert!(objects[0].vector.is_none());
    }

    #[test]
    fn test_read_records_rejects_non_array() {
        let file = write_records(r#"{"title": "Doug"}"#);
        assert!(command_for(&file).read_records("TVShow").is_err());
    }

    #[test]
    fn test_read_records_rejects_bad_vector() {
        let file = write_records(r#"[{"title": "Doug", "vector": ["a", "b"]}]"#);
        assert!(command_for(&file).read_records("TVShow").is_err());
    }
}
