//! Root model configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ConnectionParams;
use magicchat_types::SearchMode;

/// Default cache time-to-live in seconds
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Root configuration model that represents a Magic Chat configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Name of the application
    pub name: String,

    /// Vector database connection parameters
    pub connection: ConnectionParams,

    /// Search defaults
    pub search: SearchConfig,

    /// Server configuration (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

/// Search defaults applied when a request leaves them unset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Collection queried by the chat surface
    pub collection: String,

    /// Properties returned by default
    #[serde(default)]
    pub properties: Vec<String>,

    /// Default result limit
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Blend weight override for hybrid mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,

    /// Result cache time-to-live in seconds; 3600 when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,
}

fn default_limit() -> usize {
    10
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on (default: 8080)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Log level: 0=DEBUG, 1=INFO, 2=WARN, 3=ERROR
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<u8>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: Some("8080".to_string()),
            log_level: Some(1),
        }
    }
}

impl SearchConfig {
    /// Create search defaults for a collection
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            properties: Vec::new(),
            limit: default_limit(),
            alpha: None,
            cache_ttl_secs: None,
        }
    }

    /// The blend weight for a mode, honoring the configured override for
    /// hybrid searches
    pub fn alpha_for(&self, mode: SearchMode) -> f64 {
        match mode {
            SearchMode::Hybrid => self.alpha.unwrap_or_else(|| mode.default_alpha()),
            other => other.default_alpha(),
        }
    }

    /// Cache time-to-live, defaulting to one hour
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS))
    }
}

impl Model {
    /// Create a new model with the given name and connection
    pub fn new(
        name: impl Into<String>,
        connection: ConnectionParams,
        search: SearchConfig,
    ) -> Self {
        Self {
            name: name.into(),
            connection,
            search,
            server: None,
        }
    }

    /// Get the server port, defaulting to 8080
    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port.as_ref())
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080)
    }

    /// Get the log level, defaulting to 1 (INFO)
    pub fn log_level(&self) -> u8 {
        self.server.as_ref().and_then(|s| s.log_level).unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_model() -> Model {
        Model::new(
            "movie-magic",
            ConnectionParams::new("http://localhost:8080"),
            SearchConfig::new("MovieDemo"),
        )
    }

    #[test]
    fn test_model_new() {
        let model = test_model();
        assert_eq!(model.name, "movie-magic");
        assert_eq!(model.search.collection, "MovieDemo");
        assert!(model.server.is_none());
    }

    #[test]
    fn test_model_default_port() {
        assert_eq!(test_model().port(), 8080);
    }

    #[test]
    fn test_model_custom_port() {
        let mut model = test_model();
        model.server = Some(ServerConfig {
            port: Some("3000".to_string()),
            log_level: None,
        });
        assert_eq!(model.port(), 3000);
    }

    #[test]
    fn test_alpha_for_modes() {
        let mut search = SearchConfig::new("MovieDemo");
        assert_eq!(search.alpha_for(SearchMode::Keyword), 0.0);
        assert_eq!(search.alpha_for(SearchMode::Semantic), 1.0);
        assert_eq!(search.alpha_for(SearchMode::Hybrid), 0.7);

        search.alpha = Some(0.5);
        assert_eq!(search.alpha_for(SearchMode::Hybrid), 0.5);
        // Overrides only apply to hybrid; the pure modes stay pinned
        assert_eq!(search.alpha_for(SearchMode::Keyword), 0.0);
    }

    #[test]
    fn test_cache_ttl_default() {
        let search = SearchConfig::new("MovieDemo");
        assert_eq!(search.cache_ttl(), Duration::from_secs(3600));
    }
}
