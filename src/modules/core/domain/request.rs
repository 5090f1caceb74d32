//! Search request definitions

use serde::{Deserialize, Serialize};

use super::filter::Filter;
use crate::error::MagicChatError;

/// Default result limit applied when a request does not set one
pub const DEFAULT_LIMIT: usize = 10;

/// A typed search request, translated by the executor into the vector
/// database's native query shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchRequest {
    /// Keyword (term-frequency) search
    Keyword(KeywordSearch),
    /// Semantic (vector-similarity) search
    Semantic(SemanticSearch),
    /// Blended keyword + semantic search
    Hybrid(HybridSearch),
    /// Raw query passed verbatim to the remote query language
    Raw(RawQuery),
}

/// Keyword search over one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSearch {
    /// Target collection name
    pub collection: String,
    /// Query text
    pub query: String,
    /// Properties to search and return; the collection's schema applies
    /// when empty
    #[serde(default)]
    pub properties: Vec<String>,
    /// Optional filter, interpreted by the remote service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    /// Positive bound on returned rows
    pub limit: usize,
}

/// Semantic search over one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticSearch {
    /// Target collection name
    pub collection: String,
    /// Concepts searched by meaning; mutually exclusive with `near_vector`
    #[serde(default)]
    pub concepts: Vec<String>,
    /// Explicit query vector; mutually exclusive with `concepts`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub near_vector: Option<Vec<f64>>,
    /// Named target vector for collections with multiple vector spaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_vector: Option<String>,
    /// Properties to return
    #[serde(default)]
    pub properties: Vec<String>,
    /// Optional filter, interpreted by the remote service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    /// Positive bound on returned rows
    pub limit: usize,
}

/// Hybrid search over one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridSearch {
    /// Target collection name
    pub collection: String,
    /// Query text
    pub query: String,
    /// Blend weight in [0, 1]: 0 is pure keyword ranking, 1 is pure
    /// semantic similarity; the blending algorithm is owned by the remote
    /// service
    pub alpha: f64,
    /// Properties to search and return
    #[serde(default)]
    pub properties: Vec<String>,
    /// Optional filter, interpreted by the remote service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    /// Positive bound on returned rows
    pub limit: usize,
    /// Optional generative task run by the remote service over the results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generative: Option<GenerativeTask>,
}

/// Raw query text passed verbatim to the remote query language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuery {
    /// The query string
    pub query: String,
}

/// A grouped generative task the remote service runs over search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerativeTask {
    /// Prompt describing what to generate from the grouped results
    pub task: String,
    /// Properties fed to the generative module; all returned properties
    /// when empty
    #[serde(default)]
    pub properties: Vec<String>,
}

impl KeywordSearch {
    /// Create a keyword search with the default limit
    pub fn new(collection: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            query: query.into(),
            properties: Vec::new(),
            filter: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Restrict searched and returned properties
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the result limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl SemanticSearch {
    /// Create a semantic search with the default limit
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            concepts: Vec::new(),
            near_vector: None,
            target_vector: None,
            properties: Vec::new(),
            filter: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Search by the meaning of the given concepts
    pub fn with_concepts(mut self, concepts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.concepts = concepts.into_iter().map(Into::into).collect();
        self
    }

    /// Search near an explicit vector
    pub fn with_vector(mut self, vector: Vec<f64>) -> Self {
        self.near_vector = Some(vector);
        self
    }

    /// Target a named vector space
    pub fn with_target_vector(mut self, name: impl Into<String>) -> Self {
        self.target_vector = Some(name.into());
        self
    }

    /// Restrict returned properties
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the result limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl HybridSearch {
    /// Create a hybrid search with the default limit
    pub fn new(collection: impl Into<String>, query: impl Into<String>, alpha: f64) -> Self {
        Self {
            collection: collection.into(),
            query: query.into(),
            alpha,
            properties: Vec::new(),
            filter: None,
            limit: DEFAULT_LIMIT,
            generative: None,
        }
    }

    /// Restrict searched and returned properties
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the result limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Run a generative task over the results
    pub fn with_generative(mut self, task: GenerativeTask) -> Self {
        self.generative = Some(task);
        self
    }
}

impl RawQuery {
    /// Wrap a raw query string
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

impl GenerativeTask {
    /// Create a generative task with the given prompt
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            properties: Vec::new(),
        }
    }

    /// Restrict the properties fed to the generative module
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }
}

impl SearchRequest {
    /// The target collection, when the request names one
    pub fn collection(&self) -> Option<&str> {
        match self {
            SearchRequest::Keyword(search) => Some(&search.collection),
            SearchRequest::Semantic(search) => Some(&search.collection),
            SearchRequest::Hybrid(search) => Some(&search.collection),
            SearchRequest::Raw(_) => None,
        }
    }

    /// Check request invariants before translation.
    ///
    /// The limit is always a positive bound and the hybrid blend weight
    /// stays within [0, 1]; violations are caller mistakes and surface
    /// before any network call.
    pub fn validate(&self) -> Result<(), MagicChatError> {
        match self {
            SearchRequest::Keyword(search) => {
                validate_collection(&search.collection)?;
                validate_limit(search.limit)?;
                if search.query.trim().is_empty() {
                    return Err(MagicChatError::Validation(
                        "Keyword search requires query text".to_string(),
                    ));
                }
            }
            SearchRequest::Semantic(search) => {
                validate_collection(&search.collection)?;
                validate_limit(search.limit)?;
                let has_concepts = !search.concepts.is_empty();
                let has_vector = search.near_vector.is_some();
                if has_concepts == has_vector {
                    return Err(MagicChatError::Validation(
                        "Semantic search requires exactly one of concepts or a vector"
                            .to_string(),
                    ));
                }
                if let Some(vector) = &search.near_vector {
                    if vector.is_empty() {
                        return Err(MagicChatError::Validation(
                            "Semantic search vector is empty".to_string(),
                        ));
                    }
                }
            }
            SearchRequest::Hybrid(search) => {
                validate_collection(&search.collection)?;
                validate_limit(search.limit)?;
                if search.query.trim().is_empty() {
                    return Err(MagicChatError::Validation(
                        "Hybrid search requires query text".to_string(),
                    ));
                }
                if !(0.0..=1.0).contains(&search.alpha) {
                    return Err(MagicChatError::Validation(format!(
                        "Hybrid alpha must be within [0, 1], got {}",
                        search.alpha
                    )));
                }
            }
            SearchRequest::Raw(raw) => {
                if raw.query.trim().is_empty() {
                    return Err(MagicChatError::Validation(
                        "Raw query is empty".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn validate_collection(collection: &str) -> Result<(), MagicChatError> {
    if collection.trim().is_empty() {
        return Err(MagicChatError::Validation(
            "Collection name is empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_limit(limit: usize) -> Result<(), MagicChatError> {
    if limit == 0 {
        return Err(MagicChatError::Validation(
            "Result limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}
