//! Catalog lookups used to validate membership changes.

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{Filter, Product, Repo};

/// Wrapper around the organization filter endpoints.
#[derive(Debug, Clone, Copy)]
pub struct FilterApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FilterApi<'a> {
    /// Bind the wrapper to a client.
    #[must_use]
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Find a filter by name, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn find(&self, org: &str, name: &str) -> ApiResult<Option<Filter>> {
        let filters: Vec<Filter> = self
            .client
            .get(&format!("/api/organizations/{org}/filters"))
            .await?;
        Ok(filters.into_iter().find(|filter| filter.name == name))
    }
}

/// Wrapper around the organization product endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ProductApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductApi<'a> {
    /// Bind the wrapper to a client.
    #[must_use]
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Find a product by label, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn find(&self, org: &str, label: &str) -> ApiResult<Option<Product>> {
        let products: Vec<Product> = self
            .client
            .get(&format!("/api/organizations/{org}/products"))
            .await?;
        Ok(products.into_iter().find(|product| product.label == label))
    }
}

/// Wrapper around the product repository endpoints.
#[derive(Debug, Clone, Copy)]
pub struct RepoApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RepoApi<'a> {
    /// Bind the wrapper to a client.
    #[must_use]
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Find a repository by name within a product, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails.
    pub async fn find(&self, org: &str, product_id: u64, name: &str) -> ApiResult<Option<Repo>> {
        let repos: Vec<Repo> = self
            .client
            .get(&format!(
                "/api/organizations/{org}/products/{product_id}/repositories"
            ))
            .await?;
        Ok(repos.into_iter().find(|repo| repo.name == name))
    }
}
