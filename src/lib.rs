//! Retention-policy enforcement for GitHub package registries
//!
//! Fetches every package version of a repository, keeps the ones that are old
//! enough, rarely downloaded and of the configured type, and deletes them with
//! one batched GraphQL mutation per package.

pub mod config;
pub mod graphql;
pub mod package;
pub mod runner;

#[cfg(test)]
mod testing;
