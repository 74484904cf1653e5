//! Content-view actions: listing, publishing, definition CRUD, and
//! membership changes.

use async_trait::async_trait;
use curator_api::{ContentViewApi, ContentViewDefinitionApi};

use crate::action::{Action, OptionSpec, ParsedOptions, ParserBuilder};
use crate::client::{AppContext, CliError, CliResult, ExitStatus};
use crate::command::Command;
use crate::commands::{find_definition, find_environment, find_filter, find_product, find_repo, find_view};
use crate::output::Printer;
use crate::validate::Validator;

pub(crate) fn command() -> Command {
    Command::new(
        "content-view",
        "content view specific actions on the content server",
    )
    .action("list", Box::new(List))
    .action("info", Box::new(Info))
    .action("publish", Box::new(Publish))
    .action("create", Box::new(Create))
    .action("update", Box::new(Update))
    .action("delete", Box::new(Delete))
    .action("add-filter", Box::new(FilterMembership::add()))
    .action("remove-filter", Box::new(FilterMembership::remove()))
    .action("add-product", Box::new(ProductMembership::add()))
    .action("remove-product", Box::new(ProductMembership::remove()))
    .action("add-repo", Box::new(RepoMembership::add()))
    .action("remove-repo", Box::new(RepoMembership::remove()))
    .action("add-view", Box::new(ViewMembership::add()))
    .action("remove-view", Box::new(ViewMembership::remove()))
}

/// Direction of a membership change. Consulted at the single point each
/// message text is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    Add,
    Remove,
}

fn view_columns(printer: &mut Printer) {
    printer
        .add_column("id", "ID")
        .add_column("name", "Name")
        .add_column("label", "Label")
        .add_multiline_column("description", "Description")
        .add_column("organization", "Org")
        .add_column("environments", "Environments")
        .add_column("published", "Published");
}

pub(crate) struct List;

#[async_trait]
impl Action for List {
    fn description(&self) -> &'static str {
        "list known content views"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser
            .opt(OptionSpec::value("org", "name of organization (required)"))
            .opt(OptionSpec::value("environment", "environment name").with_aliases(&["env"]))
            .opt(OptionSpec::switch("published", "show only published views"))
            .opt(OptionSpec::switch("unpublished", "show unpublished views only"));
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("org");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let published = options.get_flag("published");
        let unpublished = options.get_flag("unpublished");
        if published && unpublished {
            return Err(CliError::InvalidOption(
                "cannot specify both --published and --unpublished".into(),
            ));
        }

        let environment = match options.get_str("environment") {
            Some(name) => Some(find_environment(ctx, org, name).await?),
            None => None,
        };

        let mut views = Vec::new();
        if !published {
            views.extend(
                ContentViewDefinitionApi::new(&ctx.api)
                    .list(org, environment.as_ref())
                    .await?,
            );
        }
        if !unpublished {
            views.extend(
                ContentViewApi::new(&ctx.api)
                    .list(org, environment.as_ref())
                    .await?,
            );
        }

        let mut printer = Printer::new(ctx.output);
        view_columns(&mut printer);
        printer.set_header("Content View List");
        printer.print_items(&views)?;
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct Info;

#[async_trait]
impl Action for Info {
    fn description(&self) -> &'static str {
        "show a specific content view"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser
            .opt(OptionSpec::value("org", "name of organization (required)"))
            .opt(OptionSpec::value("label", "content view label (required)"));
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("org");
        validator.require("label");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let label = options.required("label")?;

        let view = find_definition(ctx, org, label).await?;

        let mut printer = Printer::new(ctx.output);
        view_columns(&mut printer);
        printer.set_header("Content View Info");
        printer.print_item(&view)?;
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct Publish;

#[async_trait]
impl Action for Publish {
    fn description(&self) -> &'static str {
        "create a content view from a definition"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser
            .opt(OptionSpec::value("org", "name of organization (required)"))
            .opt(
                OptionSpec::value("definition", "definition label (required)").with_dest("label"),
            );
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("org");
        validator.require_as("label", "--definition");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let label = options.required("label")?;

        let definition = find_definition(ctx, org, label).await?;
        ContentViewDefinitionApi::new(&ctx.api)
            .publish(org, definition.id)
            .await?;
        println!("Successfully published content view [ {label} ]");
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct Create;

#[async_trait]
impl Action for Create {
    fn description(&self) -> &'static str {
        "define a content view"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser
            .opt(OptionSpec::value(
                "name",
                "content view definition name (required)",
            ))
            .opt(OptionSpec::value("org", "name of organization (required)"))
            .opt(OptionSpec::value("description", "definition description"))
            .opt(OptionSpec::value("label", "definition label"));
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("name");
        validator.require("org");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let name = options.required("name")?;

        ContentViewDefinitionApi::new(&ctx.api)
            .create(
                org,
                name,
                options.get_str("label"),
                options.get_str("description"),
            )
            .await?;
        println!("Successfully created content view definition [ {name} ]");
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct Update;

#[async_trait]
impl Action for Update {
    fn description(&self) -> &'static str {
        "update a content view definition"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser
            .opt(OptionSpec::value("org", "name of organization (required)"))
            .opt(
                OptionSpec::value("view", "content view definition label (required)"),
            )
            .opt(OptionSpec::value("name", "new content view name"))
            .opt(OptionSpec::value("description", "new content view description"));
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("org");
        validator.require("view");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let label = options.required("view")?;

        let definition = find_definition(ctx, org, label).await?;
        let updated = ContentViewDefinitionApi::new(&ctx.api)
            .update(
                org,
                definition.id,
                options.get_str("name"),
                options.get_str("description"),
            )
            .await?;
        println!("Successfully updated content view [ {} ]", updated.name);
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct Delete;

#[async_trait]
impl Action for Delete {
    fn description(&self) -> &'static str {
        "delete a content view definition"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser
            .opt(OptionSpec::value("label", "content view label (required)"))
            .opt(OptionSpec::value("org", "name of organization (required)"));
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("label");
        validator.require("org");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let label = options.required("label")?;

        let definition = find_definition(ctx, org, label).await?;
        ContentViewDefinitionApi::new(&ctx.api)
            .delete(org, definition.id)
            .await?;
        println!("Successfully deleted definition [ {label} ]");
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct FilterMembership {
    kind: ChangeKind,
}

impl FilterMembership {
    pub(crate) const fn add() -> Self {
        Self {
            kind: ChangeKind::Add,
        }
    }

    pub(crate) const fn remove() -> Self {
        Self {
            kind: ChangeKind::Remove,
        }
    }
}

#[async_trait]
impl Action for FilterMembership {
    fn description(&self) -> &'static str {
        match self.kind {
            ChangeKind::Add => "add a filter to a content view",
            ChangeKind::Remove => "remove a filter from a content view",
        }
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser
            .opt(OptionSpec::value("label", "content view label (required)"))
            .opt(OptionSpec::value("org", "name of organization (required)"))
            .opt(OptionSpec::value("filter", "filter name (required)"));
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("filter");
        validator.require("org");
        validator.require("label");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let label = options.required("label")?;
        let filter_name = options.required("filter")?;

        let view = find_definition(ctx, org, label).await?;
        let filter = find_filter(ctx, org, filter_name).await?;

        let api = ContentViewDefinitionApi::new(&ctx.api);
        let mut names: Vec<String> = api
            .filters(org, view.id)
            .await?
            .into_iter()
            .map(|f| f.name)
            .collect();
        match self.kind {
            ChangeKind::Add => names.push(filter.name.clone()),
            ChangeKind::Remove => {
                let before = names.len();
                names.retain(|name| name != &filter.name);
                if names.len() == before {
                    return Err(CliError::NotFound(format!(
                        "filter [ {} ] is not part of content view [ {} ]",
                        filter.name, view.label
                    )));
                }
            }
        }
        api.update_filters(org, view.id, &names).await?;

        let message = match self.kind {
            ChangeKind::Add => format!(
                "Added filter [ {} ] to content view [ {} ]",
                filter.name, view.label
            ),
            ChangeKind::Remove => format!(
                "Removed filter [ {} ] from content view [ {} ]",
                filter.name, view.label
            ),
        };
        println!("{message}");
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct ProductMembership {
    kind: ChangeKind,
}

impl ProductMembership {
    pub(crate) const fn add() -> Self {
        Self {
            kind: ChangeKind::Add,
        }
    }

    pub(crate) const fn remove() -> Self {
        Self {
            kind: ChangeKind::Remove,
        }
    }
}

#[async_trait]
impl Action for ProductMembership {
    fn description(&self) -> &'static str {
        match self.kind {
            ChangeKind::Add => "add a product to a content view",
            ChangeKind::Remove => "remove a product from a content view",
        }
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser
            .opt(OptionSpec::value("label", "content view label (required)"))
            .opt(OptionSpec::value("org", "name of organization (required)"))
            .opt(OptionSpec::value("product", "product label (required)"));
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("product");
        validator.require("org");
        validator.require("label");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let label = options.required("label")?;
        let product_label = options.required("product")?;

        let view = find_definition(ctx, org, label).await?;
        let product = find_product(ctx, org, product_label).await?;

        let api = ContentViewDefinitionApi::new(&ctx.api);
        let mut ids: Vec<u64> = api
            .products(org, view.id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        match self.kind {
            ChangeKind::Add => ids.push(product.id),
            ChangeKind::Remove => {
                let before = ids.len();
                ids.retain(|id| *id != product.id);
                if ids.len() == before {
                    return Err(CliError::NotFound(format!(
                        "product [ {} ] is not part of content view [ {} ]",
                        product.label, view.label
                    )));
                }
            }
        }
        api.update_products(org, view.id, &ids).await?;

        let message = match self.kind {
            ChangeKind::Add => format!(
                "Added product [ {} ] to content view [ {} ]",
                product.label, view.label
            ),
            ChangeKind::Remove => format!(
                "Removed product [ {} ] from content view [ {} ]",
                product.label, view.label
            ),
        };
        println!("{message}");
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct RepoMembership {
    kind: ChangeKind,
}

impl RepoMembership {
    pub(crate) const fn add() -> Self {
        Self {
            kind: ChangeKind::Add,
        }
    }

    pub(crate) const fn remove() -> Self {
        Self {
            kind: ChangeKind::Remove,
        }
    }
}

#[async_trait]
impl Action for RepoMembership {
    fn description(&self) -> &'static str {
        match self.kind {
            ChangeKind::Add => "add a repository to a content view",
            ChangeKind::Remove => "remove a repository from a content view",
        }
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser
            .opt(OptionSpec::value("label", "content view label (required)"))
            .opt(OptionSpec::value("org", "name of organization (required)"))
            .opt(OptionSpec::value("repo", "repository name (required)"))
            .opt(OptionSpec::value("product", "product label (required)"));
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("repo");
        validator.require("org");
        validator.require("label");
        validator.require("product");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let label = options.required("label")?;
        let repo_name = options.required("repo")?;
        let product_label = options.required("product")?;

        let view = find_definition(ctx, org, label).await?;
        let product = find_product(ctx, org, product_label).await?;
        let repo = find_repo(ctx, org, &product, repo_name).await?;

        let api = ContentViewDefinitionApi::new(&ctx.api);
        let mut ids: Vec<u64> = api
            .repos(org, view.id)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        match self.kind {
            ChangeKind::Add => ids.push(repo.id),
            ChangeKind::Remove => {
                let before = ids.len();
                ids.retain(|id| *id != repo.id);
                if ids.len() == before {
                    return Err(CliError::NotFound(format!(
                        "repository [ {} ] is not part of content view [ {} ]",
                        repo.name, view.label
                    )));
                }
            }
        }
        api.update_repos(org, view.id, &ids).await?;

        let message = match self.kind {
            ChangeKind::Add => format!(
                "Added repository [ {} ] to content view [ {} ]",
                repo.name, view.label
            ),
            ChangeKind::Remove => format!(
                "Removed repository [ {} ] from content view [ {} ]",
                repo.name, view.label
            ),
        };
        println!("{message}");
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct ViewMembership {
    kind: ChangeKind,
}

impl ViewMembership {
    pub(crate) const fn add() -> Self {
        Self {
            kind: ChangeKind::Add,
        }
    }

    pub(crate) const fn remove() -> Self {
        Self {
            kind: ChangeKind::Remove,
        }
    }
}

#[async_trait]
impl Action for ViewMembership {
    fn description(&self) -> &'static str {
        match self.kind {
            ChangeKind::Add => "add a component view to a composite content view",
            ChangeKind::Remove => "remove a component view from a composite content view",
        }
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser
            .opt(OptionSpec::value("label", "composite view label (required)"))
            .opt(OptionSpec::value("org", "name of organization (required)"))
            .opt(
                OptionSpec::value("content_view", "published component label (required)")
                    .with_dest("view"),
            );
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("label");
        validator.require("org");
        validator.require_as("view", "--content_view");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let label = options.required("label")?;
        let component_label = options.required("view")?;

        let composite = find_definition(ctx, org, label).await?;
        let component = find_view(ctx, org, component_label).await?;

        let api = ContentViewDefinitionApi::new(&ctx.api);
        let mut ids: Vec<u64> = api
            .components(composite.id)
            .await?
            .into_iter()
            .map(|v| v.id)
            .collect();
        match self.kind {
            ChangeKind::Add => ids.push(component.id),
            ChangeKind::Remove => {
                let before = ids.len();
                ids.retain(|id| *id != component.id);
                if ids.len() == before {
                    return Err(CliError::NotFound(format!(
                        "content view [ {} ] is not part of composite [ {} ]",
                        component.name, composite.label
                    )));
                }
            }
        }
        api.update_components(composite.id, &ids).await?;

        let message = match self.kind {
            ChangeKind::Add => format!(
                "Added content view [ {} ] to composite [ {} ]",
                component.name, composite.label
            ),
            ChangeKind::Remove => format!(
                "Removed content view [ {} ] from composite [ {} ]",
                component.name, composite.label
            ),
        };
        println!("{message}");
        Ok(ExitStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::OptionValue;
    use crate::output::OutputFormat;
    use curator_api::ApiClient;
    use curator_config::ClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    fn context_for(server: &MockServer) -> AppContext {
        let mut config = ClientConfig::default();
        config.server.url = server.base_url().parse().expect("valid URL");
        AppContext {
            api: ApiClient::new(&config).expect("build client"),
            output: OutputFormat::Table,
        }
    }

    fn options_with(pairs: &[(&str, &str)]) -> ParsedOptions {
        let mut options = ParsedOptions::default();
        for (key, value) in pairs {
            options.set(*key, OptionValue::Str((*value).to_string()));
        }
        options
    }

    fn mock_definitions(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/content_view_definitions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{
                    "id": 4,
                    "name": "Database",
                    "label": "db",
                    "environments": []
                }]));
        });
    }

    #[tokio::test]
    async fn publish_targets_the_resolved_definition() {
        let server = MockServer::start_async().await;
        mock_definitions(&server);
        let publish = server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/content_view_definitions/4/publish");
            then.status(202)
                .header("content-type", "application/json")
                .json_body(json!({}));
        });

        let ctx = context_for(&server);
        let exit = Publish
            .run(&ctx, &options_with(&[("org", "ACME"), ("label", "db")]))
            .await
            .expect("publish succeeds");
        assert_eq!(exit, ExitStatus::Success);
        publish.assert();
    }

    #[tokio::test]
    async fn conflicting_visibility_flags_are_rejected_before_any_call() {
        let server = MockServer::start_async().await;
        let ctx = context_for(&server);

        let mut options = options_with(&[("org", "ACME")]);
        options.set("published", OptionValue::Bool(true));
        options.set("unpublished", OptionValue::Bool(true));

        let err = List.run(&ctx, &options).await.expect_err("conflict");
        assert!(matches!(err, CliError::InvalidOption(_)));
    }

    #[tokio::test]
    async fn add_filter_appends_to_the_current_set() {
        let server = MockServer::start_async().await;
        mock_definitions(&server);
        server.mock(|when, then| {
            when.method(GET).path("/api/organizations/ACME/filters");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{"id": 9, "name": "no-beta"}]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/content_view_definitions/4/filters");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{"id": 8, "name": "stable-only"}]));
        });
        let update = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/organizations/ACME/content_view_definitions/4/filters")
                .json_body(json!({"filters": ["stable-only", "no-beta"]}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({}));
        });

        let ctx = context_for(&server);
        let exit = FilterMembership::add()
            .run(
                &ctx,
                &options_with(&[("org", "ACME"), ("label", "db"), ("filter", "no-beta")]),
            )
            .await
            .expect("filter added");
        assert_eq!(exit, ExitStatus::Success);
        update.assert();
    }

    #[tokio::test]
    async fn removing_an_absent_member_is_not_found() {
        let server = MockServer::start_async().await;
        mock_definitions(&server);
        server.mock(|when, then| {
            when.method(GET).path("/api/organizations/ACME/filters");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{"id": 9, "name": "no-beta"}]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/content_view_definitions/4/filters");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([]));
        });

        let ctx = context_for(&server);
        let err = FilterMembership::remove()
            .run(
                &ctx,
                &options_with(&[("org", "ACME"), ("label", "db"), ("filter", "no-beta")]),
            )
            .await
            .expect_err("filter not attached");
        assert!(matches!(err, CliError::NotFound(_)));
    }
}
