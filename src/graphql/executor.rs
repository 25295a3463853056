//! Query executor trait for talking to a GraphQL endpoint

#[cfg(test)]
use mockall::automock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graphql::error::RegistryError;

/// A query or mutation together with its variables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }
}

/// One entry of a response's top-level `errors` list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    /// Response path of the failing field; segments are names or list indices
    #[serde(default)]
    pub path: Vec<Value>,
}

impl GraphQlError {
    /// Returns true if the first path segment is `key`
    pub fn is_for(&self, key: &str) -> bool {
        self.path.first().and_then(Value::as_str) == Some(key)
    }
}

/// Trait for sending authenticated GraphQL requests
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Sends one request and returns the decoded JSON body
    ///
    /// # Returns
    /// * `Ok(Value)` - The response body, including any `errors` entries
    /// * `Err(RegistryError)` - Network failure, non-2xx status or undecodable body
    async fn execute(&self, request: GraphQlRequest) -> Result<Value, RegistryError>;
}

/// Converts a raw response body into a typed response shape
pub fn decode<T: DeserializeOwned>(body: Value) -> Result<T, RegistryError> {
    serde_json::from_value(body).map_err(|e| RegistryError::InvalidResponse(e.to_string()))
}
