//! Environment endpoints.

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::Environment;

/// Wrapper around the environment endpoints of an organization.
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentApi<'a> {
    client: &'a ApiClient,
}

impl<'a> EnvironmentApi<'a> {
    /// Bind the wrapper to a client.
    #[must_use]
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List the environments of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn list(&self, org: &str) -> ApiResult<Vec<Environment>> {
        self.client
            .get(&format!("/api/organizations/{org}/environments"))
            .await
    }

    /// Find an environment by name, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn find(&self, org: &str, name: &str) -> ApiResult<Option<Environment>> {
        let environments = self.list(org).await?;
        Ok(environments.into_iter().find(|env| env.name == name))
    }
}
