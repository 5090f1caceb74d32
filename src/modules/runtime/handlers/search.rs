//! Search execution handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{error, info};

use magicchat_core::{
    Filter, HybridSearch, KeywordSearch, MagicChatError, QueryTable, SearchConfig, SemanticSearch,
};
use magicchat_types::runtime::{SearchBody, SearchResponse};
use magicchat_types::SearchMode;

use crate::executor::SearchExecutor;
use crate::state::AppState;

/// Handler for search execution requests
pub struct SearchHandler;

impl SearchHandler {
    /// Handle POST /search
    pub async fn execute(
        State(state): State<AppState>,
        Json(body): Json<SearchBody>,
    ) -> impl IntoResponse {
        info!("Executing {} search: {}", body.mode, body.query);

        let executor = state.executor().await;
        let defaults = state.search().await;

        match Self::run(&executor, &defaults, &body).await {
            Ok(table) => {
                info!(
                    "{} search returned {} rows",
                    body.mode,
                    table.len()
                );
                let columns = table.columns().to_vec();
                let rows = table.to_json_rows();
                (StatusCode::OK, Json(SearchResponse::success(columns, rows)))
            }
            Err(e) => {
                error!("{} search failed: {}", body.mode, e);
                let status = match e.status_code() {
                    400 => StatusCode::BAD_REQUEST,
                    502 => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Json(SearchResponse::error(e.sanitized_message())))
            }
        }
    }

    async fn run(
        executor: &SearchExecutor,
        defaults: &SearchConfig,
        body: &SearchBody,
    ) -> Result<QueryTable, MagicChatError> {
        let collection = defaults.collection.clone();
        let properties = if body.properties.is_empty() {
            defaults.properties.clone()
        } else {
            body.properties.clone()
        };
        let limit = body.limit.unwrap_or(defaults.limit);
        let filter = year_filter(body.year_from, body.year_to);

        match body.mode {
            SearchMode::Keyword => {
                let mut search = KeywordSearch::new(collection, body.query.clone())
                    .with_properties(properties)
                    .with_limit(limit);
                if let Some(filter) = filter {
                    search = search.with_filter(filter);
                }
                executor.keyword_search(search).await
            }
            SearchMode::Semantic => {
                let mut search = SemanticSearch::new(collection)
                    .with_concepts([body.query.clone()])
                    .with_properties(properties)
                    .with_limit(limit);
                if let Some(filter) = filter {
                    search = search.with_filter(filter);
                }
                executor.semantic_search(search).await
            }
            SearchMode::Hybrid => {
                let mut search = HybridSearch::new(
                    collection,
                    body.query.clone(),
                    defaults.alpha_for(SearchMode::Hybrid),
                )
                .with_properties(properties)
                .with_limit(limit);
                if let Some(filter) = filter {
                    search = search.with_filter(filter);
                }
                executor.hybrid_search(search).await.map(|(table, _)| table)
            }
        }
    }
}

/// Build the release-year range filter, when either bound is set
pub(crate) fn year_filter(from: Option<i64>, to: Option<i64>) -> Option<Filter> {
    match (from, to) {
        (Some(from), Some(to)) => Some(
            Filter::by_property("release_year").greater_or_equal(from)
                & Filter::by_property("release_year").less_or_equal(to),
        ),
        (Some(from), None) => Some(Filter::by_property("release_year").greater_or_equal(from)),
        (None, Some(to)) => Some(Filter::by_property("release_year").less_or_equal(to)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_filter_both_bounds() {
        let filter = year_filter(Some(1990), Some(2024)).unwrap();
        assert_eq!(filter.conditions().len(), 2);
    }

    #[test]
    fn test_year_filter_single_bound() {
        assert_eq!(year_filter(Some(1990), None).unwrap().conditions().len(), 1);
        assert_eq!(year_filter(None, Some(2024)).unwrap().conditions().len(), 1);
    }

    #[test]
    fn test_year_filter_absent() {
        assert!(year_filter(None, None).is_none());
    }

    #[test]
    fn test_search_response_error_shape() {
        let response = SearchResponse::error("Query failed: unknown property");
        assert!(!response.success);
        assert!(response.rows.is_empty());
    }
}
