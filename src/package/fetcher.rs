//! Fetches every package of a repository together with its versions

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::{PACKAGES_PAGE_SIZE, VERSIONS_PAGE_SIZE};
use crate::graphql::error::RegistryError;
use crate::graphql::executor::{GraphQlError, GraphQlRequest, QueryExecutor, decode};
use crate::package::types::{PackageNode, PackageType, VersionNode};

/// Single-page query for packages and their versions, oldest version first
pub const FETCH_PACKAGE_VERSIONS_QUERY: &str = r#"
query fetchPackageVersions($owner: String!, $repo: String!, $packagesFirst: Int!, $versionsFirst: Int!) {
  repository(owner: $owner, name: $repo) {
    packages(first: $packagesFirst) {
      totalCount
      nodes {
        id
        name
        versions(first: $versionsFirst, orderBy: { field: CREATED_AT, direction: ASC }) {
          totalCount
          nodes {
            id
            version
            package {
              packageType
            }
            files(first: 1) {
              nodes {
                updatedAt
              }
            }
            statistics {
              downloadsTotalCount
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct FetchResponse {
    data: Option<FetchData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct FetchData {
    repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    packages: PackageConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageConnection {
    total_count: u64,
    nodes: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    id: String,
    name: String,
    versions: VersionConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionConnection {
    #[serde(default)]
    total_count: u64,
    nodes: Vec<Version>,
}

#[derive(Debug, Deserialize)]
struct Version {
    id: String,
    version: String,
    package: PackageRef,
    files: FileConnection,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageRef {
    package_type: PackageType,
}

#[derive(Debug, Deserialize)]
struct FileConnection {
    nodes: Vec<File>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct File {
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    downloads_total_count: u64,
}

impl From<Version> for VersionNode {
    fn from(v: Version) -> Self {
        Self {
            id: v.id,
            version: v.version,
            package_type: v.package.package_type,
            last_file_updated_at: v.files.nodes.first().map(|f| f.updated_at),
            downloads_total_count: v.statistics.map(|s| s.downloads_total_count),
        }
    }
}

impl From<Package> for PackageNode {
    fn from(p: Package) -> Self {
        Self {
            id: p.id,
            name: p.name,
            versions: p.versions.nodes.into_iter().map(VersionNode::from).collect(),
        }
    }
}

/// Fetches all packages of `owner/repo` and their versions
///
/// Only the first page (100 packages, 100 versions each) is retrieved.
///
/// # Returns
/// * `Ok(Vec<PackageNode>)` - Packages in registry order, versions oldest first
/// * `Err(RegistryError)` - Transport failure, or the repository could not be resolved
pub async fn fetch_package_versions(
    executor: &dyn QueryExecutor,
    owner: &str,
    repo: &str,
) -> Result<Vec<PackageNode>, RegistryError> {
    let request = GraphQlRequest::new(FETCH_PACKAGE_VERSIONS_QUERY).with_variables(json!({
        "owner": owner,
        "repo": repo,
        "packagesFirst": PACKAGES_PAGE_SIZE,
        "versionsFirst": VERSIONS_PAGE_SIZE,
    }));

    let response: FetchResponse = decode(executor.execute(request).await?)?;

    let Some(repository) = response.data.and_then(|d| d.repository) else {
        let reason = response
            .errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| format!("repository {}/{} not found", owner, repo));
        return Err(RegistryError::InvalidResponse(reason));
    };

    let packages = repository.packages;
    if packages.total_count > packages.nodes.len() as u64 {
        warn!(
            "Repository {}/{} has {} packages; only the first {} are processed",
            owner,
            repo,
            packages.total_count,
            packages.nodes.len()
        );
    }

    for package in &packages.nodes {
        let versions = &package.versions;
        if versions.total_count > versions.nodes.len() as u64 {
            warn!(
                "Package {} has {} versions; only the oldest {} are processed",
                package.name,
                versions.total_count,
                versions.nodes.len()
            );
        }
    }

    let nodes: Vec<PackageNode> = packages.nodes.into_iter().map(PackageNode::from).collect();
    let version_count: usize = nodes.iter().map(|p| p.versions.len()).sum();
    debug!("Fetched {} packages with {} versions", nodes.len(), version_count);

    Ok(nodes)
}
