//! Query transport trait definition

use async_trait::async_trait;
use magicchat_core::MagicChatError;

use super::client::WeaviateClient;

/// Trait for executing raw queries against the vector database.
///
/// The one production implementation is [`WeaviateClient`]; the seam exists
/// so executors can run against a test double.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Execute a raw query and return the response envelope
    async fn execute(&self, query: &str) -> Result<serde_json::Value, MagicChatError>;
}

#[async_trait]
impl QueryTransport for WeaviateClient {
    async fn execute(&self, query: &str) -> Result<serde_json::Value, MagicChatError> {
        self.graphql(query).await
    }
}
