//! Chat turn handler
//!
//! One turn of the conversational surface: record the user's message, run
//! the configured-collection search with the mode's blend weight, and reply
//! with results plus an optional generated recommendation. Errors surface
//! inline in the conversation rather than crashing the process.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use base64::Engine;
use tracing::{error, info};

use magicchat_core::{GenerativeTask, HybridSearch, QueryTable};
use magicchat_types::runtime::{ChatBody, ChatMessage, ChatResponse};

use crate::state::AppState;

use super::search::year_filter;

/// Handler for chat turns
pub struct ChatHandler;

impl ChatHandler {
    /// Handle POST /chat
    pub async fn execute(
        State(state): State<AppState>,
        Json(body): Json<ChatBody>,
    ) -> impl IntoResponse {
        let (session_id, session) = state.sessions.get_or_create(body.session_id.as_deref()).await;

        let query = clean_input(&body.query);
        if query.is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ChatResponse::error(session_id, "Tell me what you are looking for")),
            );
        }

        info!("Chat turn ({} mode): {}", body.mode, query);
        session.append(ChatMessage::user(body.query.clone())).await;

        let executor = state.executor().await;
        let defaults = state.search().await;

        // Every chat mode funnels through the blended search; the mode only
        // picks the weight (0 keyword, 1 semantic, configured for hybrid)
        let mut search = HybridSearch::new(
            defaults.collection.clone(),
            query,
            defaults.alpha_for(body.mode),
        )
        .with_properties(defaults.properties.clone())
        .with_limit(defaults.limit);

        if let Some(filter) = year_filter(body.year_from, body.year_to) {
            search = search.with_filter(filter);
        }

        if let Some(occasion) = body.occasion.as_deref().map(str::trim).filter(|o| !o.is_empty())
        {
            let task = format!(
                "Suggest one to two movies out of the following list, for a {}. \
                 Give a concise yet fun and positive recommendation.",
                occasion
            );
            let text_properties: Vec<String> = defaults
                .properties
                .iter()
                .filter(|p| p.as_str() != "poster")
                .cloned()
                .collect();
            search = search
                .with_generative(GenerativeTask::new(task).with_properties(text_properties));
        }

        match executor.hybrid_search(search).await {
            Ok((table, recommendation)) => {
                let images = poster_images(&table);
                let content = match &recommendation {
                    Some(text) => text.clone(),
                    None => format!("Found {} results", table.len()),
                };
                session
                    .append(ChatMessage::assistant(content).with_images(images))
                    .await;

                (
                    StatusCode::OK,
                    Json(ChatResponse::success(
                        session_id,
                        table.to_json_rows(),
                        recommendation,
                    )),
                )
            }
            Err(e) => {
                error!("Chat search failed: {}", e);
                let message = e.sanitized_message();
                session.append(ChatMessage::assistant(message.clone())).await;
                let status = match e.status_code() {
                    400 => StatusCode::BAD_REQUEST,
                    502 => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Json(ChatResponse::error(session_id, message)))
            }
        }
    }
}

/// Strip quote characters so user text cannot close a query literal upstream
fn clean_input(text: &str) -> String {
    text.replace(['"', '\''], "").trim().to_string()
}

/// Collect poster properties as image data URLs, skipping rows without a
/// valid base64 payload
fn poster_images(table: &QueryTable) -> Vec<String> {
    let engine = base64::engine::general_purpose::STANDARD;
    table
        .rows()
        .iter()
        .filter_map(|row| row.get("poster"))
        .filter_map(|value| value.as_text())
        .filter(|poster| !poster.is_empty() && engine.decode(poster).is_ok())
        .map(|poster| format!("data:image/png;base64,{}", poster))
        .collect()
}
