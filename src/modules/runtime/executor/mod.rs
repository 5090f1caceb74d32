//! Query execution module
//!
//! Ties together rendering, transport, caching, and normalization: every
//! search operation validates its request, renders it to the remote query
//! language, executes it synchronously, and normalizes the envelope into a
//! result table.

mod cache;
mod gql;
mod normalize;

pub use cache::QueryCache;
pub use gql::GraphQlBuilder;
pub use normalize::{check_errors, extract_grouped_generation, to_table};

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use magicchat_core::{
    HybridSearch, KeywordSearch, MagicChatError, QueryTable, RawQuery, SearchRequest,
    SemanticSearch,
};

use crate::connection::{QueryTransport, WeaviateConnection};

/// Query executor for one connector instance.
///
/// Each call blocks until the remote service responds or the connection
/// fails; there is no background work and no automatic retry. Results are
/// memoized per rendered query for the configured time-to-live.
pub struct SearchExecutor {
    transport: Arc<dyn QueryTransport>,
    cache: QueryCache,
    ttl: Duration,
}

impl SearchExecutor {
    /// Create an executor over an open connection
    pub fn new(connection: &WeaviateConnection, ttl: Duration) -> Self {
        Self::with_transport(connection.client(), ttl)
    }

    /// Create an executor over an arbitrary transport (test seam)
    pub fn with_transport(transport: Arc<dyn QueryTransport>, ttl: Duration) -> Self {
        Self {
            transport,
            cache: QueryCache::new(),
            ttl,
        }
    }

    /// Keyword (term-frequency) search
    pub async fn keyword_search(
        &self,
        search: KeywordSearch,
    ) -> Result<QueryTable, MagicChatError> {
        let request = SearchRequest::Keyword(search);
        let (table, _) = self.run(&request).await?;
        Ok(table)
    }

    /// Semantic (vector-similarity) search
    pub async fn semantic_search(
        &self,
        search: SemanticSearch,
    ) -> Result<QueryTable, MagicChatError> {
        let request = SearchRequest::Semantic(search);
        let (table, _) = self.run(&request).await?;
        Ok(table)
    }

    /// Hybrid search, returning the result table and the generated text
    /// when the request carried a generative task
    pub async fn hybrid_search(
        &self,
        search: HybridSearch,
    ) -> Result<(QueryTable, Option<String>), MagicChatError> {
        let request = SearchRequest::Hybrid(search);
        self.run(&request).await
    }

    /// Execute a caller-supplied query string verbatim
    pub async fn raw_query(&self, query: &str) -> Result<QueryTable, MagicChatError> {
        let request = SearchRequest::Raw(RawQuery::new(query));
        let (table, _) = self.run(&request).await?;
        Ok(table)
    }

    /// Drop all memoized results
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    async fn run(
        &self,
        request: &SearchRequest,
    ) -> Result<(QueryTable, Option<String>), MagicChatError> {
        let query = GraphQlBuilder::build(request)?;

        if let Some(hit) = self.cache.lookup(&query, self.ttl) {
            debug!("Cache hit for query ({} rows)", hit.0.len());
            return Ok(hit);
        }

        let envelope = self.transport.execute(&query).await?;
        let table = to_table(&envelope)?;
        let generated = extract_grouped_generation(&envelope);

        debug!("Query returned {} rows", table.len());
        self.cache
            .store(&query, self.ttl, table.clone(), generated.clone());

        Ok((table, generated))
    }
}
