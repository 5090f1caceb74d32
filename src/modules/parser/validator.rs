//! Configuration validation

use magicchat_core::{MagicChatError, Model};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Regex pattern for valid names (lower-kebab-case or lower_snake_case)
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*(?:[-_][a-z0-9]+)*$").unwrap());

/// Configuration validator
pub struct ConfigValidator {
    /// Whether to validate names strictly
    strict_names: bool,
}

impl ConfigValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self { strict_names: true }
    }

    /// Create a validator with lenient name checking
    pub fn lenient() -> Self {
        Self { strict_names: false }
    }

    /// Validate the entire model configuration
    pub fn validate(&self, model: &Model) -> Result<(), MagicChatError> {
        self.validate_model_name(&model.name)?;
        self.validate_connection(model)?;
        self.validate_search(model)?;
        Ok(())
    }

    /// Validate the model name
    fn validate_model_name(&self, name: &str) -> Result<(), MagicChatError> {
        if name.is_empty() {
            return Err(MagicChatError::Validation(
                "Model name cannot be empty".to_string(),
            ));
        }

        if self.strict_names && !NAME_PATTERN.is_match(name) {
            return Err(MagicChatError::Validation(format!(
                "Invalid model name '{}': must be lower-kebab-case or lower_snake_case",
                name
            )));
        }

        Ok(())
    }

    /// Validate connection parameters
    fn validate_connection(&self, model: &Model) -> Result<(), MagicChatError> {
        // Parameter-level checks (empty URL, bad scheme, empty key)
        model.connection.validate()?;

        // Relaxed startup only makes sense against a local target
        if model.connection.relaxed_startup && !model.connection.is_local() {
            return Err(MagicChatError::Validation(
                "relaxed_startup is only supported for local (http) targets".to_string(),
            ));
        }

        for name in model.connection.headers.keys() {
            if name.trim().is_empty() {
                return Err(MagicChatError::Validation(
                    "Additional header with empty name".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Validate search defaults
    fn validate_search(&self, model: &Model) -> Result<(), MagicChatError> {
        let search = &model.search;

        if search.collection.trim().is_empty() {
            return Err(MagicChatError::Validation(
                "Search collection cannot be empty".to_string(),
            ));
        }

        if search.limit == 0 {
            return Err(MagicChatError::Validation(
                "Search limit must be at least 1".to_string(),
            ));
        }

        if let Some(alpha) = search.alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(MagicChatError::Validation(format!(
                    "Search alpha must be within [0, 1], got {}",
                    alpha
                )));
            }
        }

        if search.cache_ttl_secs == Some(0) {
            return Err(MagicChatError::Validation(
                "Cache ttl must be nonzero when set".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for property in &search.properties {
            if property.trim().is_empty() {
                return Err(MagicChatError::Validation(
                    "Search property names cannot be empty".to_string(),
                ));
            }
            if !seen.insert(property.as_str()) {
                return Err(MagicChatError::Validation(format!(
                    "Duplicate search property: '{}'",
                    property
                )));
            }
        }

        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
