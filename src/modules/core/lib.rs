//! Core domain logic for Magic Chat
//!
//! This crate contains the core domain models, business logic, and error types
//! for the Magic Chat vector-search connector.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::MagicChatError;
