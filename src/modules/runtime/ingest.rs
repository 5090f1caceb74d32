//! Batch ingestion
//!
//! Write-side companion to the search executors: seeds collections with
//! records (and optional caller-supplied vectors) through the remote batch
//! endpoint. All indexing and vectorization happens on the remote side.

use std::sync::Arc;
use tracing::{debug, info};

use magicchat_core::{DataObject, MagicChatError};

use crate::connection::WeaviateClient;

/// Batch writer over an open connection
pub struct BatchWriter {
    client: Arc<WeaviateClient>,
}

impl BatchWriter {
    /// Create a writer over the given client handle
    pub fn new(client: Arc<WeaviateClient>) -> Self {
        Self { client }
    }

    /// Create the collection if it does not exist yet.
    ///
    /// Returns true when the collection was created by this call.
    pub async fn ensure_collection(&self, name: &str) -> Result<bool, MagicChatError> {
        if self.client.collection_exists(name).await? {
            debug!("Collection {} already exists", name);
            return Ok(false);
        }
        self.client.create_collection(name).await?;
        info!("Created collection {}", name);
        Ok(true)
    }

    /// Delete a collection and all of its objects
    pub async fn delete_collection(&self, name: &str) -> Result<(), MagicChatError> {
        self.client.delete_collection(name).await?;
        info!("Deleted collection {}", name);
        Ok(())
    }

    /// Write a batch of objects, returning how many were accepted.
    ///
    /// The remote reports per-object outcomes; any rejected object fails
    /// the whole call with the service's error detail so a partial write
    /// never looks like success.
    pub async fn write(&self, objects: Vec<DataObject>) -> Result<usize, MagicChatError> {
        if objects.is_empty() {
            return Ok(0);
        }

        let report = self.client.batch_objects(&objects).await?;
        let results = report.as_array().ok_or_else(|| {
            MagicChatError::Normalization(format!("Unexpected batch report shape: {}", report))
        })?;

        let mut failures: Vec<String> = Vec::new();
        for result in results {
            let status = result
                .get("result")
                .and_then(|r| r.get("status"))
                .and_then(|s| s.as_str())
                .unwrap_or("UNKNOWN");
            if status != "SUCCESS" {
                let detail = result
                    .get("result")
                    .and_then(|r| r.get("errors"))
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| format!("status {}", status));
                failures.push(detail);
            }
        }

        if !failures.is_empty() {
            return Err(MagicChatError::Query(format!(
                "{} of {} objects rejected: {}",
                failures.len(),
                results.len(),
                failures.join("; ")
            )));
        }

        info!("Wrote {} objects", results.len());
        Ok(results.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicchat_core::ConnectionParams;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn writer_for(server: &MockServer) -> BatchWriter {
        let client = WeaviateClient::new(&ConnectionParams::new(server.uri())).unwrap();
        BatchWriter::new(Arc::new(client))
    }

    fn show(title: &str, vector: Vec<f64>) -> DataObject {
        DataObject::new("TVShow")
            .with_property("title", json!(title))
            .with_vector(vector)
    }

    #[tokio::test]
    async fn test_write_sends_objects_with_vectors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/batch/objects"))
            .and(body_partial_json(json!({
                "objects": [{"class": "TVShow", "properties": {"title": "Animaniacs"}, "vector": [0.1, 0.2, 0.3, 0.4, 0.5]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"result": {"status": "SUCCESS"}}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let writer = writer_for(&server).await;
        let written = writer
            .write(vec![show("Animaniacs", vec![0.1, 0.2, 0.3, 0.4, 0.5])])
            .await
            .unwrap();
        assert_eq!(written, 1);
    }

    #[tokio::test]
    async fn test_rejected_object_fails_the_write() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/batch/objects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"result": {"status": "SUCCESS"}},
                {"result": {"status": "FAILED", "errors": {"error": [{"message": "invalid property"}]}}}
            ])))
            .mount(&server)
            .await;

        let writer = writer_for(&server).await;
        let err = writer
            .write(vec![
                show("Doug", vec![0.2, 0.3]),
                show("Hey Arnold!", vec![0.6, 0.5]),
            ])
            .await
            .unwrap_err();

        match err {
            MagicChatError::Query(detail) => assert!(detail.contains("invalid property")),
            other => panic!("expected Query error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let server = MockServer::start().await;
        // No mock mounted: any request would fail the test
        let writer = writer_for(&server).await;
        assert_eq!(writer.write(Vec::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ensure_collection_creates_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/schema/TVShow"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/schema"))
            .and(body_partial_json(json!({"class": "TVShow"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let writer = writer_for(&server).await;
        assert!(writer.ensure_collection("TVShow").await.unwrap());
    }
}
