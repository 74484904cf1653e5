//! Changeset endpoints.

use serde::Serialize;
use serde_json::json;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{Changeset, TaskStatus};

/// Wrapper around the changeset endpoints of an environment.
#[derive(Debug, Clone, Copy)]
pub struct ChangesetApi<'a> {
    client: &'a ApiClient,
}

/// Content patch applied to a changeset.
///
/// The wire format encodes additions and removals as `+`/`-` prefixed keys.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ContentPatch {
    /// Packages to add, each bound to its product.
    #[serde(rename = "+packages")]
    pub add_packages: Vec<PatchItem>,
    /// Packages to remove.
    #[serde(rename = "-packages")]
    pub remove_packages: Vec<PatchItem>,
    /// Errata to add.
    #[serde(rename = "+errata")]
    pub add_errata: Vec<PatchItem>,
    /// Errata to remove.
    #[serde(rename = "-errata")]
    pub remove_errata: Vec<PatchItem>,
    /// Repositories to add.
    #[serde(rename = "+repos")]
    pub add_repos: Vec<PatchItem>,
    /// Repositories to remove.
    #[serde(rename = "-repos")]
    pub remove_repos: Vec<PatchItem>,
    /// Products to add, by name.
    #[serde(rename = "+products")]
    pub add_products: Vec<String>,
    /// Products to remove, by name.
    #[serde(rename = "-products")]
    pub remove_products: Vec<String>,
}

/// A patch entry bound to the product it was picked from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchItem {
    /// Member name.
    pub name: String,
    /// Product the member is picked from.
    pub product: String,
}

impl<'a> ChangesetApi<'a> {
    /// Bind the wrapper to a client.
    #[must_use]
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List the changesets of an environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn list(&self, org: &str, env_id: u64) -> ApiResult<Vec<Changeset>> {
        self.client
            .get(&format!(
                "/api/organizations/{org}/environments/{env_id}/changesets"
            ))
            .await
    }

    /// Find a changeset by name, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn find(&self, org: &str, env_id: u64, name: &str) -> ApiResult<Option<Changeset>> {
        let changesets = self.list(org, env_id).await?;
        Ok(changesets.into_iter().find(|cs| cs.name == name))
    }

    /// Create a changeset in an environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn create(&self, org: &str, env_id: u64, name: &str) -> ApiResult<Changeset> {
        self.client
            .post(
                &format!("/api/organizations/{org}/environments/{env_id}/changesets"),
                &json!({ "changeset": { "name": name } }),
            )
            .await
    }

    /// Apply a content patch to a changeset.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn update_content(
        &self,
        org: &str,
        env_id: u64,
        id: u64,
        patch: &ContentPatch,
    ) -> ApiResult<Changeset> {
        self.client
            .put(
                &format!("/api/organizations/{org}/environments/{env_id}/changesets/{id}"),
                &json!({ "patch": patch }),
            )
            .await
    }

    /// Delete a changeset, returning the server's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn delete(&self, org: &str, env_id: u64, id: u64) -> ApiResult<String> {
        self.client
            .delete(&format!(
                "/api/organizations/{org}/environments/{env_id}/changesets/{id}"
            ))
            .await
    }

    /// Start promoting a changeset to the next environment.
    ///
    /// Promotion is asynchronous; the returned status carries the task
    /// handle to poll.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn promote(&self, org: &str, env_id: u64, id: u64) -> ApiResult<TaskStatus> {
        self.client
            .post(
                &format!("/api/organizations/{org}/environments/{env_id}/changesets/{id}/promote"),
                &json!({}),
            )
            .await
    }
}
