//! OpenAPI documentation handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// Handler for OpenAPI documentation
pub struct DocsHandler;

impl DocsHandler {
    /// Handle GET /docs
    pub async fn handle(State(state): State<AppState>) -> impl IntoResponse {
        let search = state.search().await;
        let spec = Self::generate_spec(&search.collection);
        (StatusCode::OK, Json(spec))
    }

    /// Generate an OpenAPI 3.0 specification for the chat/search surface
    fn generate_spec(collection: &str) -> serde_json::Value {
        let search_body = json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "mode": {"type": "string", "enum": ["keyword", "semantic", "hybrid"], "default": "hybrid"},
                "query": {"type": "string"},
                "properties": {"type": "array", "items": {"type": "string"}},
                "limit": {"type": "integer", "minimum": 1},
                "year_from": {"type": "integer"},
                "year_to": {"type": "integer"}
            }
        });

        let chat_body = json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "session_id": {"type": "string"},
                "query": {"type": "string"},
                "occasion": {"type": "string"},
                "mode": {"type": "string", "enum": ["keyword", "semantic", "hybrid"], "default": "hybrid"},
                "year_from": {"type": "integer"},
                "year_to": {"type": "integer"}
            }
        });

        json!({
            "openapi": "3.0.3",
            "info": {
                "title": "Magic Chat",
                "description": format!("Chat-style search over the {} collection", collection),
                "version": env!("CARGO_PKG_VERSION")
            },
            "paths": {
                "/search": {
                    "post": {
                        "summary": "Run a keyword, semantic, or hybrid search",
                        "operationId": "search",
                        "requestBody": {
                            "required": true,
                            "content": {"application/json": {"schema": search_body}}
                        },
                        "responses": {
                            "200": {"description": "Result table (columns and rows)"},
                            "400": {"description": "Invalid request or rejected query"}
                        }
                    }
                },
                "/chat": {
                    "post": {
                        "summary": "Run one chat turn against the configured collection",
                        "operationId": "chat",
                        "requestBody": {
                            "required": true,
                            "content": {"application/json": {"schema": chat_body}}
                        },
                        "responses": {
                            "200": {"description": "Results with an optional generated recommendation"},
                            "400": {"description": "Invalid request or rejected query"}
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Liveness check",
                        "operationId": "health",
                        "responses": {"200": {"description": "OK"}}
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_all_routes() {
        let spec = DocsHandler::generate_spec("MovieDemo");
        let paths = spec["paths"].as_object().unwrap();
        assert!(paths.contains_key("/search"));
        assert!(paths.contains_key("/chat"));
        assert!(paths.contains_key("/health"));
    }

    #[test]
    fn test_spec_mentions_collection() {
        let spec = DocsHandler::generate_spec("MovieDemo");
        assert!(spec["info"]["description"]
            .as_str()
            .unwrap()
            .contains("MovieDemo"));
    }
}
