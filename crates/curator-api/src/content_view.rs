//! Content-view and content-view definition endpoints.
//!
//! Published views and unpublished definitions live behind separate
//! endpoint families with the same record shape.

use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{ContentView, Environment, Filter, Product, Repo};

/// Wrapper around the published content-view endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ContentViewApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ContentViewApi<'a> {
    /// Bind the wrapper to a client.
    #[must_use]
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List the published views of an organization, optionally scoped to an
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn list(
        &self,
        org: &str,
        environment: Option<&Environment>,
    ) -> ApiResult<Vec<ContentView>> {
        let path = format!("/api/organizations/{org}/content_views");
        match environment {
            Some(env) => {
                let env_id = env.id.to_string();
                self.client
                    .get_with_query(&path, &[("environment_id", env_id.as_str())])
                    .await
            }
            None => self.client.get(&path).await,
        }
    }

    /// Find a published view by label, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn find(&self, org: &str, label: &str) -> ApiResult<Option<ContentView>> {
        let views = self.list(org, None).await?;
        Ok(views.into_iter().find(|view| view.label == label))
    }
}

/// Wrapper around the content-view definition endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ContentViewDefinitionApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ContentViewDefinitionApi<'a> {
    /// Bind the wrapper to a client.
    #[must_use]
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List the definitions of an organization, optionally scoped to an
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn list(
        &self,
        org: &str,
        environment: Option<&Environment>,
    ) -> ApiResult<Vec<ContentView>> {
        let path = format!("/api/organizations/{org}/content_view_definitions");
        match environment {
            Some(env) => {
                let env_id = env.id.to_string();
                self.client
                    .get_with_query(&path, &[("environment_id", env_id.as_str())])
                    .await
            }
            None => self.client.get(&path).await,
        }
    }

    /// Find a definition by label, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn find(&self, org: &str, label: &str) -> ApiResult<Option<ContentView>> {
        let definitions = self.list(org, None).await?;
        Ok(definitions.into_iter().find(|def| def.label == label))
    }

    /// Publish a definition as a content view.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn publish(&self, org: &str, id: u64) -> ApiResult<()> {
        let _: Value = self
            .client
            .post(
                &format!("/api/organizations/{org}/content_view_definitions/{id}/publish"),
                &json!({}),
            )
            .await?;
        Ok(())
    }

    /// Create a definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn create(
        &self,
        org: &str,
        name: &str,
        label: Option<&str>,
        description: Option<&str>,
    ) -> ApiResult<ContentView> {
        self.client
            .post(
                &format!("/api/organizations/{org}/content_view_definitions"),
                &json!({
                    "content_view_definition": {
                        "name": name,
                        "label": label,
                        "description": description,
                    }
                }),
            )
            .await
    }

    /// Update a definition's name or description.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn update(
        &self,
        org: &str,
        id: u64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> ApiResult<ContentView> {
        self.client
            .put(
                &format!("/api/organizations/{org}/content_view_definitions/{id}"),
                &json!({
                    "content_view_definition": {
                        "name": name,
                        "description": description,
                    }
                }),
            )
            .await
    }

    /// Delete a definition, returning the server's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn delete(&self, org: &str, id: u64) -> ApiResult<String> {
        self.client
            .delete(&format!(
                "/api/organizations/{org}/content_view_definitions/{id}"
            ))
            .await
    }

    /// List the filters attached to a definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn filters(&self, org: &str, id: u64) -> ApiResult<Vec<Filter>> {
        self.client
            .get(&format!(
                "/api/organizations/{org}/content_view_definitions/{id}/filters"
            ))
            .await
    }

    /// Replace the filters attached to a definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn update_filters(&self, org: &str, id: u64, names: &[String]) -> ApiResult<()> {
        let _: Value = self
            .client
            .put(
                &format!("/api/organizations/{org}/content_view_definitions/{id}/filters"),
                &json!({ "filters": names }),
            )
            .await?;
        Ok(())
    }

    /// List the products attached to a definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn products(&self, org: &str, id: u64) -> ApiResult<Vec<Product>> {
        self.client
            .get(&format!(
                "/api/organizations/{org}/content_view_definitions/{id}/products"
            ))
            .await
    }

    /// Replace the products attached to a definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn update_products(&self, org: &str, id: u64, ids: &[u64]) -> ApiResult<()> {
        let _: Value = self
            .client
            .put(
                &format!("/api/organizations/{org}/content_view_definitions/{id}/products"),
                &json!({ "products": ids }),
            )
            .await?;
        Ok(())
    }

    /// List the repositories attached to a definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn repos(&self, org: &str, id: u64) -> ApiResult<Vec<Repo>> {
        self.client
            .get(&format!(
                "/api/organizations/{org}/content_view_definitions/{id}/repositories"
            ))
            .await
    }

    /// Replace the repositories attached to a definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn update_repos(&self, org: &str, id: u64, ids: &[u64]) -> ApiResult<()> {
        let _: Value = self
            .client
            .put(
                &format!("/api/organizations/{org}/content_view_definitions/{id}/repositories"),
                &json!({ "repos": ids }),
            )
            .await?;
        Ok(())
    }

    /// List the component views of a composite definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn components(&self, id: u64) -> ApiResult<Vec<ContentView>> {
        self.client
            .get(&format!("/api/content_view_definitions/{id}/content_views"))
            .await
    }

    /// Replace the component views of a composite definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn update_components(&self, id: u64, ids: &[u64]) -> ApiResult<()> {
        let _: Value = self
            .client
            .put(
                &format!("/api/content_view_definitions/{id}/content_views"),
                &json!({ "content_views": ids }),
            )
            .await?;
        Ok(())
    }
}
