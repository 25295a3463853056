//! GraphQL transport layer
//!
//! # Modules
//!
//! - [`executor`]: `QueryExecutor` trait, request and error-entry types
//! - [`github`]: reqwest-based executor for the GitHub GraphQL API
//! - [`error`]: Transport error type

pub mod error;
pub mod executor;
pub mod github;
