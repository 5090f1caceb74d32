//! HTTP request handlers for the Magic Chat server
//!
//! This module contains handlers for search execution, the chat surface,
//! and OpenAPI documentation.

mod chat;
mod docs;
mod search;

pub use chat::ChatHandler;
pub use docs::DocsHandler;
pub use search::SearchHandler;
