//! Mock GitHub GraphQL registry for end-to-end tests

use chrono::{DateTime, TimeDelta, Utc};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{Value, json};

use package_prune::config::ActionSettings;
use package_prune::graphql::github::GitHubGraphQlClient;

pub const TEST_TOKEN: &str = "ghp_test_token";

/// A mockito server standing in for the GraphQL endpoint
pub struct GraphQlServer {
    pub server: ServerGuard,
}

impl GraphQlServer {
    pub async fn start() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/graphql", self.server.url())
    }

    pub fn client(&self) -> GitHubGraphQlClient {
        GitHubGraphQlClient::new(&self.endpoint(), TEST_TOKEN).unwrap()
    }
}

pub fn test_settings(package_type: &str, max_downloads: u64, min_age_days: i64) -> ActionSettings {
    ActionSettings {
        owner: "octo-org".to_string(),
        repo: "octo-app".to_string(),
        min_age: TimeDelta::days(min_age_days),
        package_type: package_type.to_string(),
        max_downloads,
    }
}

pub fn days_ago(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Some(now - TimeDelta::days(days))
}

/// A version node as returned by the fetch query; `updated_at: None` means no files
pub fn version_node(
    id: &str,
    package_type: &str,
    downloads: u64,
    updated_at: Option<DateTime<Utc>>,
) -> Value {
    let files: Vec<Value> = updated_at
        .into_iter()
        .map(|t| json!({ "updatedAt": t.to_rfc3339() }))
        .collect();

    json!({
        "id": id,
        "version": format!("{}-version", id),
        "package": { "packageType": package_type },
        "files": { "nodes": files },
        "statistics": { "downloadsTotalCount": downloads }
    })
}

/// Body of a fetch response holding the given packages
pub fn packages_body(packages: Vec<(&str, Vec<Value>)>) -> String {
    let nodes: Vec<Value> = packages
        .into_iter()
        .map(|(name, versions)| {
            json!({
                "id": format!("P_{}", name),
                "name": name,
                "versions": { "nodes": versions }
            })
        })
        .collect();

    json!({
        "data": {
            "repository": {
                "packages": { "totalCount": nodes.len(), "nodes": nodes }
            }
        }
    })
    .to_string()
}

/// Mocks the fetch query for `octo-org/octo-app`
pub async fn mock_fetch(server: &mut GraphQlServer, status: usize, body: &str) -> Mock {
    server
        .server
        .mock("POST", "/graphql")
        .match_header("authorization", format!("Bearer {}", TEST_TOKEN).as_str())
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("fetchPackageVersions".to_string()),
            Matcher::PartialJson(json!({
                "variables": { "owner": "octo-org", "repo": "octo-app" }
            })),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

/// Mocks the delete mutation whose variables map aliases to version ids
pub async fn mock_delete(
    server: &mut GraphQlServer,
    variables: Value,
    status: usize,
    body: Value,
    expected_calls: usize,
) -> Mock {
    server
        .server
        .mock("POST", "/graphql")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("deletePackageVersions".to_string()),
            Matcher::PartialJson(json!({ "variables": variables })),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(expected_calls)
        .create_async()
        .await
}
