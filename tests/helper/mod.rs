//! Shared test utilities

pub mod registry;

pub use registry::{
    GraphQlServer, days_ago, mock_delete, mock_fetch, packages_body, test_settings, version_node,
};
