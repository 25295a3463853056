//! Package retention pipeline
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Fetcher   │────▶│   Filter    │────▶│   Deleter   │
//! │ (snapshot)  │     │   (pure)    │     │ (mutation)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │   Report    │
//!                                         │ (outcomes)  │
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`]: Package and version snapshot types
//! - [`fetcher`]: Fetches all packages and versions of a repository
//! - [`filter`]: Selects the versions eligible for deletion
//! - [`deleter`]: Builds and reconciles the batched delete mutation
//! - [`report`]: Per-version outcomes and report output

pub mod deleter;
pub mod fetcher;
pub mod filter;
pub mod report;
pub mod types;
