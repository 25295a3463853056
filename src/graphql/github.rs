//! GitHub GraphQL API executor

use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::USER_AGENT;
use crate::graphql::error::RegistryError;
use crate::graphql::executor::{GraphQlRequest, QueryExecutor};

/// Preview media types that expose package listing and deletion
pub const PACKAGES_PREVIEW_ACCEPT: &str = "application/vnd.github.packages-preview+json,application/vnd.github.package-deletes-preview+json";

/// Executor that posts requests to the GitHub GraphQL endpoint with a bearer token
pub struct GitHubGraphQlClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl GitHubGraphQlClient {
    /// Creates a client for `endpoint`, e.g. `https://api.github.com/graphql`
    pub fn new(endpoint: &str, token: &str) -> Result<Self, RegistryError> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl QueryExecutor for GitHubGraphQlClient {
    async fn execute(&self, request: GraphQlRequest) -> Result<Value, RegistryError> {
        debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(ACCEPT, PACKAGES_PREVIEW_ACCEPT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GitHub GraphQL API returned status {}: {}", status, self.endpoint);
            return Err(RegistryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub GraphQL response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }
}
