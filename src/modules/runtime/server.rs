//! HTTP server for Magic Chat

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use magicchat_core::{MagicChatError, Model, ServerConfig};

use crate::connection::WeaviateConnection;
use crate::executor::SearchExecutor;
use crate::handlers::{ChatHandler, DocsHandler, SearchHandler};
use crate::state::AppState;

/// Runtime server for Magic Chat
pub struct Runtime {
    model: Arc<Model>,
    state: AppState,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Apply port override to a model configuration
fn apply_port_override(mut model: Model, port_override: Option<u16>) -> Model {
    if let Some(port) = port_override {
        if let Some(ref mut server) = model.server {
            server.port = Some(port.to_string());
        } else {
            model.server = Some(ServerConfig {
                port: Some(port.to_string()),
                log_level: None,
            });
        }
    }
    model
}

impl Runtime {
    /// Create a new runtime from a model configuration
    pub async fn new(model: Model) -> Result<Self, MagicChatError> {
        Self::with_port_override(model, None).await
    }

    /// Create a new runtime with an optional port override
    pub async fn with_port_override(
        model: Model,
        port_override: Option<u16>,
    ) -> Result<Self, MagicChatError> {
        let model = Arc::new(apply_port_override(model, port_override));

        // Connect and build the executor
        let executor = Self::build_executor(&model).await?;
        let state = AppState::new(executor, model.search.clone());

        Ok(Self { model, state })
    }

    /// Open a connection per the model and wrap it in an executor
    async fn build_executor(model: &Model) -> Result<Arc<SearchExecutor>, MagicChatError> {
        let connection = WeaviateConnection::connect(model.connection.clone()).await?;
        Ok(Arc::new(SearchExecutor::new(
            &connection,
            model.search.cache_ttl(),
        )))
    }

    /// Build the Axum router
    fn build_router(&self) -> Router {
        // CORS configuration
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // Request timeout
        let timeout = TimeoutLayer::new(Duration::from_secs(30));

        Router::new()
            // Search and chat endpoints
            .route("/search", post(SearchHandler::execute))
            .route("/chat", post(ChatHandler::execute))
            // Documentation endpoint
            .route("/docs", get(DocsHandler::handle))
            // Health check
            .route("/health", get(Self::health_check))
            // State
            .with_state(self.state.clone())
            // Middleware
            .layer(cors)
            .layer(timeout)
            .layer(TraceLayer::new_for_http())
    }

    /// Health check endpoint
    async fn health_check() -> &'static str {
        "OK"
    }

    /// Start the server
    pub async fn run(&self) -> Result<(), MagicChatError> {
        let addr: SocketAddr = format!("0.0.0.0:{}", self.model.port())
            .parse()
            .map_err(|e| MagicChatError::Server(format!("Invalid address: {}", e)))?;

        let app = self.build_router();

        info!("Starting Magic Chat server on http://{}", addr);
        info!("Model: {}", self.model.name);
        info!("Collection: {}", self.model.search.collection);
        info!("OpenAPI docs: http://{}/docs", addr);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| MagicChatError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(Self::shutdown_signal())
            .await
            .map_err(|e| MagicChatError::Server(format!("Server error: {}", e)))?;

        info!("Server stopped");
        self.shutdown().await?;

        Ok(())
    }

    /// Wait for shutdown signal
    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                debug!("Received CTRL+C, shutting down...");
            }
            _ = terminate => {
                debug!("Received SIGTERM, shutting down...");
            }
        }
    }

    /// Gracefully shutdown the runtime
    pub async fn shutdown(&self) -> Result<(), MagicChatError> {
        info!("Closing vector database connection...");
        // Dropping the executor releases the underlying network session;
        // clear the cache so a restart never serves stale tables
        self.state.executor().await.clear_cache();
        info!("Shutdown complete");
        Ok(())
    }

    /// Reload the runtime with a new model configuration.
    ///
    /// Reconnects and swaps the executor and search defaults in place; open
    /// chat sessions survive the reload. The listen port is fixed at
    /// startup and not affected.
    pub async fn reload(&self, new_model: Model) -> Result<(), MagicChatError> {
        info!("Reloading configuration...");

        let executor = Self::build_executor(&new_model).await?;
        self.state.replace(executor, new_model.search.clone()).await;

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Get the model
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Get the shared application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }
}
