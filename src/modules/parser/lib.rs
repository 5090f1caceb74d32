//! Configuration parsing for Magic Chat
//!
//! This crate handles parsing of YAML (.magic) configuration files,
//! validation, and environment variable substitution.

pub mod env;
pub mod validator;
pub mod yaml;

pub use validator::ConfigValidator;
pub use yaml::YamlParser;

use magicchat_core::{MagicChatError, Model};

/// Parse a configuration file from a path
pub fn parse_file(path: &str) -> Result<Model, MagicChatError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        MagicChatError::Configuration(format!("Failed to read file '{}': {}", path, e))
    })?;

    parse_string(&content)
}

/// Parse a configuration from a string
pub fn parse_string(content: &str) -> Result<Model, MagicChatError> {
    // Parse YAML
    let model = YamlParser::parse(content)?;

    // Validate configuration
    let validator = ConfigValidator::new();
    validator.validate(&model)?;

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_config() {
        let yaml = r#"
name: movie-magic
connection:
  url: "http://localhost:8080"
search:
  collection: MovieDemo
"#;
        let model = parse_string(yaml).unwrap();
        assert_eq!(model.name, "movie-magic");
        assert_eq!(model.connection.url, "http://localhost:8080");
        assert_eq!(model.search.collection, "MovieDemo");
    }

    #[test]
    fn test_parse_rejects_invalid_alpha() {
        let yaml = r#"
name: movie-magic
connection:
  url: "http://localhost:8080"
search:
  collection: MovieDemo
  alpha: 1.5
"#;
        assert!(parse_string(yaml).is_err());
    }
}
