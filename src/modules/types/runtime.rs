//! Runtime type definitions for request/response handling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::mode::SearchMode;

/// Search execution request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchBody {
    /// Ranking mode to use
    #[serde(default = "default_mode")]
    pub mode: SearchMode,

    /// Free-text query
    pub query: String,

    /// Properties to return (server defaults apply when empty)
    #[serde(default)]
    pub properties: Vec<String>,

    /// Maximum number of rows to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Inclusive lower bound on the release year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_from: Option<i64>,

    /// Inclusive upper bound on the release year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_to: Option<i64>,
}

fn default_mode() -> SearchMode {
    SearchMode::Hybrid
}

/// Search execution response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Whether the search succeeded
    pub success: bool,
    /// Error message if the search failed
    #[serde(default)]
    pub error: String,
    /// Column names in table order
    #[serde(default)]
    pub columns: Vec<String>,
    /// Result rows, each a flat map of column name to value
    #[serde(default)]
    pub rows: Vec<HashMap<String, serde_json::Value>>,
}

impl SearchResponse {
    /// Create a successful response with a result table
    pub fn success(columns: Vec<String>, rows: Vec<HashMap<String, serde_json::Value>>) -> Self {
        Self {
            success: true,
            error: String::new(),
            columns,
            rows,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// Chat turn request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBody {
    /// Session to append this turn to; a new session is created when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// What the user is looking for
    pub query: String,

    /// Viewing occasion used to prompt the remote generative module
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,

    /// Ranking mode to use
    #[serde(default = "default_mode")]
    pub mode: SearchMode,

    /// Inclusive lower bound on the release year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_from: Option<i64>,

    /// Inclusive upper bound on the release year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_to: Option<i64>,
}

/// Chat turn response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Whether the turn succeeded
    pub success: bool,
    /// Error message if the turn failed
    #[serde(default)]
    pub error: String,
    /// Session this turn belongs to
    pub session_id: String,
    /// Search results shown for this turn
    #[serde(default)]
    pub results: Vec<HashMap<String, serde_json::Value>>,
    /// Generated recommendation, when the remote generative module ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl ChatResponse {
    /// Create a successful chat response
    pub fn success(
        session_id: impl Into<String>,
        results: Vec<HashMap<String, serde_json::Value>>,
        recommendation: Option<String>,
    ) -> Self {
        Self {
            success: true,
            error: String::new(),
            session_id: session_id.into(),
            results,
            recommendation,
        }
    }

    /// Create an error chat response
    pub fn error(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            session_id: session_id.into(),
            results: Vec::new(),
            recommendation: None,
        }
    }
}

/// A single entry in a session's append-only message log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who produced the message ("user" or "assistant")
    pub role: String,
    /// Message text
    pub content: String,
    /// Image data URLs attached to the message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// When the message was appended
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
            images: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Attach image data URLs to this message
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}
