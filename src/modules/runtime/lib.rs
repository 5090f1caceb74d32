//! Runtime server for Magic Chat
//!
//! This crate provides the vector-database connector (connection lifecycle,
//! query executors, result normalization, caching), batch ingestion, and the
//! HTTP server with its request handlers.

pub mod connection;
pub mod executor;
pub mod handlers;
pub mod ingest;
pub mod server;
pub mod state;

pub use connection::{QueryTransport, WeaviateClient, WeaviateConnection};
pub use executor::SearchExecutor;
pub use handlers::{ChatHandler, DocsHandler, SearchHandler};
pub use ingest::BatchWriter;
pub use server::Runtime;
pub use state::{AppState, SessionStore};
