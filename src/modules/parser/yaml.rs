//! YAML configuration parser

use magicchat_core::{ConnectionParams, MagicChatError, Model, SearchConfig, ServerConfig};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::env::EnvSubstitutor;

/// YAML parser for Magic Chat configuration files
pub struct YamlParser;

/// `.magic` config schema with permissive scalar handling.
///
/// Ports are routinely written as bare numbers in YAML, so the server
/// section is deserialized leniently and coerced afterwards.
#[derive(Debug, Deserialize)]
struct MagicConfig {
    name: String,

    connection: MagicConnection,

    search: MagicSearch,

    #[serde(default)]
    server: Option<MagicServer>,
}

#[derive(Debug, Deserialize)]
struct MagicConnection {
    url: String,

    #[serde(default)]
    api_key: Option<String>,

    #[serde(default)]
    headers: BTreeMap<String, String>,

    #[serde(default)]
    relaxed_startup: bool,
}

#[derive(Debug, Deserialize)]
struct MagicSearch {
    collection: String,

    #[serde(default)]
    properties: Vec<String>,

    #[serde(default)]
    limit: Option<usize>,

    #[serde(default)]
    alpha: Option<f64>,

    #[serde(default)]
    cache_ttl_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct MagicServer {
    #[serde(default)]
    port: Option<serde_yaml::Value>,

    #[serde(default)]
    log_level: Option<u8>,
}

impl YamlParser {
    /// Parse a YAML string into a Model
    pub fn parse(content: &str) -> Result<Model, MagicChatError> {
        // First, substitute environment variables in the YAML content
        let substitutor = EnvSubstitutor::new();
        let substituted = substitutor.substitute(content)?;

        Self::parse_raw(&substituted)
    }

    /// Parse a YAML string without environment variable substitution
    pub fn parse_raw(content: &str) -> Result<Model, MagicChatError> {
        let config = serde_yaml::from_str::<MagicConfig>(content)
            .map_err(|e| MagicChatError::Configuration(format!("YAML parse error: {}", e)))?;
        Ok(config_to_model(config))
    }
}

fn config_to_model(config: MagicConfig) -> Model {
    let mut connection = ConnectionParams::new(config.connection.url);
    if let Some(api_key) = config.connection.api_key {
        connection = connection.with_api_key(api_key);
    }
    for (name, value) in config.connection.headers {
        connection = connection.with_header(name, value);
    }
    if config.connection.relaxed_startup {
        connection = connection.with_relaxed_startup();
    }

    let mut search = SearchConfig::new(config.search.collection);
    search.properties = config.search.properties;
    if let Some(limit) = config.search.limit {
        search.limit = limit;
    }
    search.alpha = config.search.alpha;
    search.cache_ttl_secs = config.search.cache_ttl_secs;

    let server = config.server.map(|s| ServerConfig {
        port: s.port.and_then(yaml_scalar_to_string),
        log_level: s.log_level,
    });

    let mut model = Model::new(config.name, connection, search);
    model.server = server;
    model
}

fn yaml_scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s),
        // For non-scalars (seq/map), just serialize them.
        other => serde_yaml::to_string(&other)
            .ok()
            .map(|s| s.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
name: movie-magic
connection:
  url: "http://localhost:8080"
search:
  collection: MovieDemo
"#;
        let model = YamlParser::parse(yaml).unwrap();
        assert_eq!(model.name, "movie-magic");
        assert_eq!(model.connection.url, "http://localhost:8080");
        assert!(model.connection.api_key.is_none());
        assert_eq!(model.search.collection, "MovieDemo");
        assert_eq!(model.search.limit, 10);
        assert!(model.server.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
name: movie-magic
connection:
  url: "https://cluster.example"
  api_key: "secret"
  headers:
    X-Cohere-Api-Key: "provider-key"
search:
  collection: MovieDemo
  properties:
    - title
    - tagline
    - poster
  limit: 10
  alpha: 0.7
  cache_ttl_secs: 600
server:
  port: 3000
  log_level: 2
"#;
        let model = YamlParser::parse(yaml).unwrap();
        assert_eq!(model.connection.api_key.as_deref(), Some("secret"));
        assert_eq!(
            model.connection.headers.get("X-Cohere-Api-Key").map(String::as_str),
            Some("provider-key")
        );
        assert_eq!(model.search.properties, vec!["title", "tagline", "poster"]);
        assert_eq!(model.search.alpha, Some(0.7));
        assert_eq!(model.search.cache_ttl_secs, Some(600));
        // Numeric port coerced to string
        assert_eq!(model.server.as_ref().unwrap().port, Some("3000".to_string()));
        assert_eq!(model.port(), 3000);
    }

    #[test]
    fn test_parse_relaxed_startup() {
        let yaml = r#"
name: movie-magic
connection:
  url: "http://localhost:8080"
  relaxed_startup: true
search:
  collection: MovieDemo
"#;
        let model = YamlParser::parse(yaml).unwrap();
        assert!(model.connection.relaxed_startup);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let yaml = "invalid: yaml: content: [";
        let result = YamlParser::parse(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_missing_connection() {
        let yaml = r#"
name: movie-magic
search:
  collection: MovieDemo
"#;
        assert!(YamlParser::parse(yaml).is_err());
    }
}
