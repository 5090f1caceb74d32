//! Low-level HTTP client for the vector database

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use tracing::debug;

use magicchat_core::{ConnectionParams, DataObject, MagicChatError};

/// Thin transport over the vector database's HTTP API.
///
/// Carries the authentication headers on every request; all query semantics
/// (ranking, filtering, generation) live on the remote side.
#[derive(Debug)]
pub struct WeaviateClient {
    http: reqwest::Client,
    base_url: String,
}

impl WeaviateClient {
    /// Build a client for the given parameters.
    ///
    /// Fails fast with a configuration error when a header name or value
    /// cannot be encoded; no network traffic happens here.
    pub fn new(params: &ConnectionParams) -> Result<Self, MagicChatError> {
        let mut headers = HeaderMap::new();

        if let Some(api_key) = &params.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
                MagicChatError::Configuration("API key contains invalid header characters".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in &params.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                MagicChatError::Configuration(format!("Invalid header name: '{}'", name))
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                MagicChatError::Configuration(format!("Invalid value for header '{}'", name))
            })?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| MagicChatError::Connection(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            http,
            base_url: params.url.trim_end_matches('/').to_string(),
        })
    }

    /// Probe the readiness endpoint.
    ///
    /// Returns `Ok(false)` when the service answers but is not ready;
    /// transport failures are connection errors.
    pub async fn is_ready(&self) -> Result<bool, MagicChatError> {
        let url = format!("{}/v1/.well-known/ready", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MagicChatError::Connection(format!("Readiness probe failed: {}", e)))?;
        Ok(response.status().is_success())
    }

    /// Execute a raw query against the query endpoint and return the
    /// response envelope.
    ///
    /// The envelope may still carry a query-level `errors` array; checking
    /// it is the executor's job, so an error never masquerades as a result.
    pub async fn graphql(&self, query: &str) -> Result<serde_json::Value, MagicChatError> {
        let url = format!("{}/v1/graphql", self.base_url);
        debug!("Executing query against {}", url);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|e| MagicChatError::Connection(format!("Query request failed: {}", e)))?;

        Self::check_http_status(response.status(), "query")?;

        response
            .json()
            .await
            .map_err(|e| MagicChatError::Normalization(format!("Invalid response body: {}", e)))
    }

    /// Write a batch of objects, returning the per-object result report
    pub async fn batch_objects(
        &self,
        objects: &[DataObject],
    ) -> Result<serde_json::Value, MagicChatError> {
        let url = format!("{}/v1/batch/objects", self.base_url);
        debug!("Writing batch of {} objects", objects.len());

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "objects": objects }))
            .send()
            .await
            .map_err(|e| MagicChatError::Connection(format!("Batch request failed: {}", e)))?;

        Self::check_http_status(response.status(), "batch write")?;

        response
            .json()
            .await
            .map_err(|e| MagicChatError::Normalization(format!("Invalid batch response: {}", e)))
    }

    /// Create a collection (class) with the remote service's defaults
    pub async fn create_collection(&self, name: &str) -> Result<(), MagicChatError> {
        let url = format!("{}/v1/schema", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "class": name }))
            .send()
            .await
            .map_err(|e| MagicChatError::Connection(format!("Schema request failed: {}", e)))?;

        Self::check_http_status(response.status(), "create collection")
    }

    /// Check whether a collection (class) exists
    pub async fn collection_exists(&self, name: &str) -> Result<bool, MagicChatError> {
        let url = format!("{}/v1/schema/{}", self.base_url, name);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MagicChatError::Connection(format!("Schema request failed: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                Self::check_http_status(status, "collection lookup")?;
                Ok(true)
            }
        }
    }

    /// Delete a collection (class) and all of its objects
    pub async fn delete_collection(&self, name: &str) -> Result<(), MagicChatError> {
        let url = format!("{}/v1/schema/{}", self.base_url, name);
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| MagicChatError::Connection(format!("Schema request failed: {}", e)))?;

        Self::check_http_status(response.status(), "delete collection")
    }

    /// Map an HTTP status to the error taxonomy: authentication failures
    /// are connection errors, other rejections are query errors.
    fn check_http_status(status: StatusCode, operation: &str) -> Result<(), MagicChatError> {
        if status.is_success() {
            return Ok(());
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(MagicChatError::Connection(
                format!("Authentication failed during {} ({})", operation, status),
            )),
            status if status.is_server_error() => Err(MagicChatError::Connection(format!(
                "Vector database failed during {} ({})",
                operation, status
            ))),
            status => Err(MagicChatError::Query(format!(
                "Vector database rejected {} ({})",
                operation, status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeaviateClient {
        WeaviateClient::new(&ConnectionParams::new(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_auth_headers_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/.well-known/ready"))
            .and(header("authorization", "Bearer secret"))
            .and(header("X-Cohere-Api-Key", "provider-key"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let params = ConnectionParams::new(server.uri())
            .with_api_key("secret")
            .with_header("X-Cohere-Api-Key", "provider-key");
        let client = WeaviateClient::new(&params).unwrap();
        assert!(client.is_ready().await.unwrap());
    }

    #[tokio::test]
    async fn test_graphql_posts_query_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .and(body_partial_json(json!({"query": "{ Get { TVShow { title } } }"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"Get": {"TVShow": []}}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let envelope = client.graphql("{ Get { TVShow { title } } }").await.unwrap();
        assert!(envelope["data"]["Get"]["TVShow"].is_array());
    }

    #[tokio::test]
    async fn test_unauthorized_is_a_connection_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/graphql"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.graphql("{ Get { TVShow { title } } }").await.unwrap_err();
        assert!(matches!(err, MagicChatError::Connection(_)));
    }

    #[tokio::test]
    async fn test_collection_exists_maps_404_to_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/schema/Ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/schema/TVShow"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"class": "TVShow"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(!client.collection_exists("Ghost").await.unwrap());
        assert!(client.collection_exists("TVShow").await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_header_fails_before_network() {
        let params = ConnectionParams::new("http://localhost:8080")
            .with_header("Bad Header Name", "value");
        let err = WeaviateClient::new(&params).unwrap_err();
        assert!(matches!(err, MagicChatError::Configuration(_)));
    }
}
