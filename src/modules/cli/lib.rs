//! Magic Chat CLI
//!
//! This crate provides the command-line interface for Magic Chat including:
//! - run: Start the server
//! - dev: Start in development mode with hot reload
//! - search: Run a one-shot search from the terminal
//! - load: Seed a collection from a JSON file
//! - init: Initialize a new Magic Chat project

pub mod commands;

pub use commands::{Cli, Commands};
