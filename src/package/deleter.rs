//! Batched deletion of package versions
//!
//! Each package's eligible versions are deleted with one mutation holding one
//! `deletePackageVersion` field per version. Fields are aliased `v0`, `v1`, …
//! and the version ids travel as `ID!` variables, so ids never need to be valid
//! GraphQL names. The alias table maps results back to the version ids.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::graphql::error::RegistryError;
use crate::graphql::executor::{GraphQlError, GraphQlRequest, QueryExecutor, decode};
use crate::package::report::{DeletionOutcome, PackageReport};
use crate::package::types::PackageNode;

/// Failure reason used when the response carries no matching error entry
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed";

/// A generated batch-delete mutation and its alias table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteMutation {
    query: String,
    /// alias -> version id, in build order
    aliases: IndexMap<String, String>,
}

impl DeleteMutation {
    /// Builds the mutation for the given version ids
    ///
    /// Duplicate ids are collapsed so every version is deleted once.
    pub fn build<'a>(version_ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut aliases: IndexMap<String, String> = IndexMap::new();
        for id in version_ids {
            if !aliases.values().any(|existing| existing == id) {
                aliases.insert(format!("v{}", aliases.len()), id.to_string());
            }
        }

        let params = aliases
            .keys()
            .map(|alias| format!("${}: ID!", alias))
            .collect::<Vec<_>>()
            .join(", ");
        let fields = aliases
            .keys()
            .map(|alias| {
                format!(
                    "  {alias}: deletePackageVersion(input: {{packageVersionId: ${alias}}}) {{ success }}"
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let query = format!("mutation deletePackageVersions({}) {{\n{}\n}}\n", params, fields);

        Self { query, aliases }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the version id behind an alias
    pub fn version_id(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Aliases and version ids, in build order
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, id)| (a.as_str(), id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// The request to send: query text plus one `ID!` variable per alias
    pub fn to_request(&self) -> GraphQlRequest {
        let variables: Map<String, Value> = self
            .aliases
            .iter()
            .map(|(alias, id)| (alias.clone(), Value::String(id.clone())))
            .collect();

        GraphQlRequest::new(self.query.clone()).with_variables(Value::Object(variables))
    }
}

/// Response to a batch-delete mutation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub data: Option<IndexMap<String, Option<DeleteResult>>>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteResult {
    pub success: Option<bool>,
}

impl MutationResponse {
    fn succeeded(&self, alias: &str) -> bool {
        self.data
            .as_ref()
            .and_then(|data| data.get(alias))
            .and_then(|result| result.as_ref())
            .and_then(|result| result.success)
            .unwrap_or(false)
    }

    fn failure_message(&self, alias: &str) -> &str {
        self.errors
            .iter()
            .find(|e| e.is_for(alias))
            .map_or(DEFAULT_FAILURE_MESSAGE, |e| e.message.as_str())
    }
}

/// Correlates a mutation response with the versions it was built for
///
/// Every alias yields exactly one outcome, independent of the others. A missing
/// or null result counts as a failure; its reason is the first error whose path
/// starts with the alias, or [`DEFAULT_FAILURE_MESSAGE`].
pub fn reconcile(mutation: &DeleteMutation, response: &MutationResponse) -> Vec<DeletionOutcome> {
    mutation
        .aliases()
        .map(|(alias, version_id)| {
            if response.succeeded(alias) {
                DeletionOutcome::succeeded(version_id)
            } else {
                DeletionOutcome::failed(version_id, response.failure_message(alias))
            }
        })
        .collect()
}

/// Deletes a package's (already filtered) versions
///
/// # Returns
/// * `Ok(PackageReport)` - `NothingMatched` without any request when there is
///   nothing to delete, otherwise one outcome per version
/// * `Err(RegistryError)` - The mutation could not be submitted
pub async fn delete_package_versions(
    executor: &dyn QueryExecutor,
    package: &PackageNode,
) -> Result<PackageReport, RegistryError> {
    if package.versions.is_empty() {
        return Ok(PackageReport::nothing_matched(&package.name));
    }

    let mutation = DeleteMutation::build(package.versions.iter().map(|v| v.id.as_str()));
    debug!("Deleting {} versions of {}", mutation.len(), package.name);

    let response: MutationResponse = decode(executor.execute(mutation.to_request()).await?)?;

    Ok(PackageReport::processed(
        &package.name,
        reconcile(&mutation, &response),
    ))
}
