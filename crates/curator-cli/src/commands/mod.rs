//! Per-entity actions grouped into commands.

pub(crate) mod changeset;
pub(crate) mod content_view;
pub(crate) mod task;

use curator_api::{
    Changeset, ChangesetApi, ContentView, ContentViewApi, ContentViewDefinitionApi, Environment,
    EnvironmentApi, Filter, FilterApi, Product, ProductApi, Repo, RepoApi,
};

use crate::client::{AppContext, CliError, CliResult};
use crate::command::Registry;

/// The full command registry for the CLI.
pub(crate) fn registry() -> Registry {
    Registry::new()
        .register(changeset::command())
        .register(content_view::command())
        .register(task::command())
}

// Entity lookups shared by the actions. An absent entity is a data error
// reported with the names the user typed.

pub(crate) async fn find_environment(
    ctx: &AppContext,
    org: &str,
    name: &str,
) -> CliResult<Environment> {
    EnvironmentApi::new(&ctx.api)
        .find(org, name)
        .await?
        .ok_or_else(|| {
            CliError::NotFound(format!(
                "environment [ {name} ] not found in organization [ {org} ]"
            ))
        })
}

pub(crate) async fn find_changeset(
    ctx: &AppContext,
    org: &str,
    environment: &Environment,
    name: &str,
) -> CliResult<Changeset> {
    ChangesetApi::new(&ctx.api)
        .find(org, environment.id, name)
        .await?
        .ok_or_else(|| {
            CliError::NotFound(format!(
                "changeset [ {name} ] not found in environment [ {} ]",
                environment.name
            ))
        })
}

pub(crate) async fn find_definition(
    ctx: &AppContext,
    org: &str,
    label: &str,
) -> CliResult<ContentView> {
    ContentViewDefinitionApi::new(&ctx.api)
        .find(org, label)
        .await?
        .ok_or_else(|| {
            CliError::NotFound(format!(
                "content view definition [ {label} ] not found in organization [ {org} ]"
            ))
        })
}

pub(crate) async fn find_view(ctx: &AppContext, org: &str, label: &str) -> CliResult<ContentView> {
    ContentViewApi::new(&ctx.api)
        .find(org, label)
        .await?
        .ok_or_else(|| {
            CliError::NotFound(format!(
                "content view [ {label} ] not found in organization [ {org} ]"
            ))
        })
}

pub(crate) async fn find_filter(ctx: &AppContext, org: &str, name: &str) -> CliResult<Filter> {
    FilterApi::new(&ctx.api)
        .find(org, name)
        .await?
        .ok_or_else(|| {
            CliError::NotFound(format!(
                "filter [ {name} ] not found in organization [ {org} ]"
            ))
        })
}

pub(crate) async fn find_product(ctx: &AppContext, org: &str, label: &str) -> CliResult<Product> {
    ProductApi::new(&ctx.api)
        .find(org, label)
        .await?
        .ok_or_else(|| {
            CliError::NotFound(format!(
                "product [ {label} ] not found in organization [ {org} ]"
            ))
        })
}

pub(crate) async fn find_repo(
    ctx: &AppContext,
    org: &str,
    product: &Product,
    name: &str,
) -> CliResult<Repo> {
    RepoApi::new(&ctx.api)
        .find(org, product.id, name)
        .await?
        .ok_or_else(|| {
            CliError::NotFound(format!(
                "repository [ {name} ] not found in product [ {} ]",
                product.label
            ))
        })
}
