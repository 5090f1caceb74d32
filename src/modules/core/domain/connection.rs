//! Connection parameter configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::MagicChatError;

/// Parameters for connecting to the vector database.
///
/// Immutable after construction: the connector consumes these on every
/// connect call and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Endpoint address, e.g. `http://localhost:8080` or a managed cloud URL
    pub url: String,

    /// API key for authenticated (cloud) targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Additional headers sent on every request, e.g. a provider key for
    /// the remote generative module
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Tolerate a failed readiness probe on local targets
    #[serde(default)]
    pub relaxed_startup: bool,
}

impl ConnectionParams {
    /// Create parameters for the given endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            headers: BTreeMap::new(),
            relaxed_startup: false,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Add an additional header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Tolerate a failed readiness probe (local targets only)
    pub fn with_relaxed_startup(mut self) -> Self {
        self.relaxed_startup = true;
        self
    }

    /// Returns true if the endpoint is a local, non-TLS target
    pub fn is_local(&self) -> bool {
        self.url.starts_with("http://")
    }

    /// Check that the parameters are usable before any network call
    pub fn validate(&self) -> Result<(), MagicChatError> {
        if self.url.trim().is_empty() {
            return Err(MagicChatError::Configuration(
                "Connection URL is missing or empty".to_string(),
            ));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(MagicChatError::Configuration(format!(
                "Connection URL must start with http:// or https://: '{}'",
                self.url
            )));
        }
        if let Some(key) = &self.api_key {
            if key.trim().is_empty() {
                return Err(MagicChatError::Configuration(
                    "API key is set but empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
