//! Changeset actions: list, info, create, update, delete, promote.

use async_trait::async_trait;
use curator_api::{
    Changeset, ChangesetApi, ContentPatch, PatchItem, TaskApi, TaskState, TaskStatus,
};
use serde_json::Value;

use crate::action::{Action, OptionSpec, ParsedOptions, ParserBuilder, TaggedValue};
use crate::client::{AppContext, CliError, CliResult, ExitStatus};
use crate::command::Command;
use crate::commands::{find_changeset, find_environment};
use crate::output::{Printer, format_date};
use crate::task::{PollOptions, wait_for_task};
use crate::validate::Validator;

pub(crate) fn command() -> Command {
    Command::new("changeset", "changeset specific actions on the content server")
        .action("list", Box::new(List))
        .action("info", Box::new(Info))
        .action("create", Box::new(Create))
        .action("update", Box::new(Update))
        .action("delete", Box::new(Delete))
        .action("promote", Box::new(Promote))
}

fn add_scope_options(parser: &mut ParserBuilder) {
    parser
        .opt(OptionSpec::value("org", "name of organization (required)"))
        .opt(
            OptionSpec::value("environment", "environment name (required)").with_aliases(&["env"]),
        );
}

fn require_scope(validator: &mut Validator) {
    validator.require("org");
    validator.require("environment");
}

fn display_record(changeset: &Changeset) -> CliResult<Value> {
    let mut record = serde_json::to_value(changeset).map_err(CliError::failure)?;
    record["updated_at"] = Value::String(format_date(changeset.updated_at));
    Ok(record)
}

pub(crate) struct List;

#[async_trait]
impl Action for List {
    fn description(&self) -> &'static str {
        "list new changesets of an environment"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        add_scope_options(parser);
    }

    fn check_options(&self, validator: &mut Validator) {
        require_scope(validator);
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let env_name = options.required("environment")?;

        let environment = find_environment(ctx, org, env_name).await?;
        let changesets = ChangesetApi::new(&ctx.api).list(org, environment.id).await?;
        let records = changesets
            .iter()
            .map(display_record)
            .collect::<CliResult<Vec<_>>>()?;

        let mut printer = Printer::new(ctx.output);
        printer
            .add_column("id", "ID")
            .add_column("name", "Name")
            .add_column("updated_at", "Updated")
            .add_column("state", "State")
            .add_column("environment_id", "Env ID")
            .add_column("environment_name", "Environment");
        printer.set_header("Changeset List");
        printer.print_items(&records)?;
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct Info;

#[async_trait]
impl Action for Info {
    fn description(&self) -> &'static str {
        "detailed information about a changeset"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        add_scope_options(parser);
        parser.opt(OptionSpec::value("name", "changeset name (required)"));
    }

    fn check_options(&self, validator: &mut Validator) {
        require_scope(validator);
        validator.require("name");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let env_name = options.required("environment")?;
        let name = options.required("name")?;

        let environment = find_environment(ctx, org, env_name).await?;
        let changeset = find_changeset(ctx, org, &environment, name).await?;

        let mut record = display_record(&changeset)?;
        record["environment_name"] = Value::String(environment.name.clone());
        record["errata"] = Value::String(joined(changeset.errata.iter().map(|e| e.display_name.as_str())));
        record["packages"] = Value::String(joined(changeset.packages.iter().map(|p| p.display_name.as_str())));
        record["repositories"] = Value::String(joined(changeset.repos.iter().map(|r| r.display_name.as_str())));
        record["products"] = Value::String(joined(changeset.products.iter().map(|p| p.name.as_str())));

        let mut printer = Printer::new(ctx.output);
        printer
            .add_column("id", "ID")
            .add_column("name", "Name")
            .add_column("updated_at", "Updated")
            .add_column("state", "State")
            .add_column("environment_id", "Env ID")
            .add_column("environment_name", "Environment")
            .add_multiline_column("errata", "Errata")
            .add_multiline_column("products", "Products")
            .add_multiline_column("packages", "Packages")
            .add_multiline_column("repositories", "Repositories");
        printer.set_header("Changeset Info");
        printer.print_item(&record)?;
        Ok(ExitStatus::Success)
    }
}

fn joined<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join("\n")
}

pub(crate) struct Create;

#[async_trait]
impl Action for Create {
    fn description(&self) -> &'static str {
        "create a new changeset for an environment"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        add_scope_options(parser);
        parser.opt(OptionSpec::value("name", "changeset name (required)"));
    }

    fn check_options(&self, validator: &mut Validator) {
        require_scope(validator);
        validator.require("name");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let env_name = options.required("environment")?;
        let name = options.required("name")?;

        let environment = find_environment(ctx, org, env_name).await?;
        let created = ChangesetApi::new(&ctx.api)
            .create(org, environment.id, name)
            .await?;
        println!(
            "Successfully created changeset [ {} ] for environment [ {} ]",
            created.name, environment.name
        );
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct Update;

#[async_trait]
impl Action for Update {
    fn description(&self) -> &'static str {
        "update the content of a changeset"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        add_scope_options(parser);
        parser
            .opt(OptionSpec::value("name", "changeset name (required)"))
            .opt(OptionSpec::append(
                "add_product",
                "product to add to the changeset",
            ))
            .opt(OptionSpec::append(
                "remove_product",
                "product to remove from the changeset",
            ))
            .opt(OptionSpec::append(
                "from_product",
                "product from which the following packages/errata/repositories are picked",
            ))
            .opt(OptionSpec::tagged(
                "add_package",
                "from_product",
                "package to add to the changeset",
            ))
            .opt(OptionSpec::tagged(
                "remove_package",
                "from_product",
                "package to remove from the changeset",
            ))
            .opt(OptionSpec::tagged(
                "add_erratum",
                "from_product",
                "erratum to add to the changeset",
            ))
            .opt(OptionSpec::tagged(
                "remove_erratum",
                "from_product",
                "erratum to remove from the changeset",
            ))
            .opt(OptionSpec::tagged(
                "add_repo",
                "from_product",
                "repository to add to the changeset",
            ))
            .opt(OptionSpec::tagged(
                "remove_repo",
                "from_product",
                "repository to remove from the changeset",
            ));
    }

    fn check_options(&self, validator: &mut Validator) {
        require_scope(validator);
        validator.require("name");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let env_name = options.required("environment")?;
        let name = options.required("name")?;

        let environment = find_environment(ctx, org, env_name).await?;
        let changeset = find_changeset(ctx, org, &environment, name).await?;

        let patch = ContentPatch {
            add_packages: patch_items(options.get_tagged("add_package")),
            remove_packages: patch_items(options.get_tagged("remove_package")),
            add_errata: patch_items(options.get_tagged("add_erratum")),
            remove_errata: patch_items(options.get_tagged("remove_erratum")),
            add_repos: patch_items(options.get_tagged("add_repo")),
            remove_repos: patch_items(options.get_tagged("remove_repo")),
            add_products: options.get_list("add_product").to_vec(),
            remove_products: options.get_list("remove_product").to_vec(),
        };

        ChangesetApi::new(&ctx.api)
            .update_content(org, changeset.environment_id, changeset.id, &patch)
            .await?;
        println!("Successfully updated changeset [ {name} ]");
        Ok(ExitStatus::Success)
    }
}

fn patch_items(values: &[TaggedValue]) -> Vec<PatchItem> {
    values
        .iter()
        .map(|item| PatchItem {
            name: item.value.clone(),
            product: item.tag.clone(),
        })
        .collect()
}

pub(crate) struct Delete;

#[async_trait]
impl Action for Delete {
    fn description(&self) -> &'static str {
        "delete a changeset"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        add_scope_options(parser);
        parser.opt(OptionSpec::value("name", "changeset name (required)"));
    }

    fn check_options(&self, validator: &mut Validator) {
        require_scope(validator);
        validator.require("name");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let env_name = options.required("environment")?;
        let name = options.required("name")?;

        let environment = find_environment(ctx, org, env_name).await?;
        let changeset = find_changeset(ctx, org, &environment, name).await?;
        let message = ChangesetApi::new(&ctx.api)
            .delete(org, changeset.environment_id, changeset.id)
            .await?;
        println!("{message}");
        Ok(ExitStatus::Success)
    }
}

pub(crate) struct Promote;

#[async_trait]
impl Action for Promote {
    fn description(&self) -> &'static str {
        "promote a changeset to the next environment"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        add_scope_options(parser);
        parser.opt(OptionSpec::value("name", "changeset name (required)"));
    }

    fn check_options(&self, validator: &mut Validator) {
        require_scope(validator);
        validator.require("name");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let org = options.required("org")?;
        let env_name = options.required("environment")?;
        let name = options.required("name")?;

        let environment = find_environment(ctx, org, env_name).await?;
        let changeset = find_changeset(ctx, org, &environment, name).await?;

        let api = ChangesetApi::new(&ctx.api);
        let task = api
            .promote(org, changeset.environment_id, changeset.id)
            .await?;

        let tasks = TaskApi::new(&ctx.api);
        let status = wait_for_task(
            &tasks,
            task.handle(),
            PollOptions::with_message("Promoting the changeset, please wait... "),
        )
        .await?;

        let (exit, message) = promotion_outcome(name, &status);
        println!("{message}");
        Ok(exit)
    }
}

fn promotion_outcome(name: &str, status: &TaskStatus) -> (ExitStatus, String) {
    if status.state == TaskState::Finished {
        (
            ExitStatus::Success,
            format!("Changeset [ {name} ] promoted"),
        )
    } else {
        (
            ExitStatus::DataError,
            format!(
                "Changeset [ {name} ] promotion failed: {}",
                first_error(status)
            ),
        )
    }
}

/// Pull the first error out of a task result payload. The server embeds a
/// JSON document inside a JSON string; fall back to the raw payload when
/// the shape is unexpected.
fn first_error(status: &TaskStatus) -> String {
    let decoded = match &status.result {
        Some(Value::String(raw)) => {
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.clone()))
        }
        Some(other) => other.clone(),
        None => Value::Null,
    };
    if let Some(entry) = decoded.get("errors").and_then(|errors| errors.get(0)) {
        return entry
            .as_str()
            .map_or_else(|| entry.to_string(), ToString::to_string);
    }
    match decoded {
        Value::Null => "unknown error".to_string(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::OptionValue;
    use crate::output::OutputFormat;
    use curator_api::{ApiClient, TaskHandle};
    use curator_config::ClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    fn context_for(server: &MockServer) -> AppContext {
        let mut config = ClientConfig::default();
        config.server.url = server.base_url().parse().expect("valid URL");
        AppContext {
            api: ApiClient::new(&config).expect("build client"),
            output: OutputFormat::Table,
        }
    }

    fn scoped_options(name: Option<&str>) -> ParsedOptions {
        let mut options = ParsedOptions::default();
        options.set("org", OptionValue::Str("ACME".into()));
        options.set("environment", OptionValue::Str("Dev".into()));
        if let Some(name) = name {
            options.set("name", OptionValue::Str(name.into()));
        }
        options
    }

    fn mock_scope(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/api/organizations/ACME/environments");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{"id": 2, "name": "Dev"}]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/environments/2/changesets");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{
                    "id": 7,
                    "name": "CS1",
                    "state": "new",
                    "updated_at": "2024-03-01T10:00:00Z",
                    "environment_id": 2
                }]));
        });
    }

    #[test]
    fn finished_promotion_names_the_changeset() {
        let status = TaskStatus {
            uuid: TaskHandle::new(Uuid::new_v4()),
            state: TaskState::Finished,
            result: None,
        };
        let (exit, message) = promotion_outcome("CS1", &status);
        assert_eq!(exit, ExitStatus::Success);
        assert!(message.contains("CS1"));
        assert!(message.contains("promoted"));
    }

    #[test]
    fn failed_promotion_surfaces_the_embedded_error() {
        let status = TaskStatus {
            uuid: TaskHandle::new(Uuid::new_v4()),
            state: TaskState::Error,
            result: Some(Value::String("{\"errors\":[\"conflict\"]}".into())),
        };
        let (exit, message) = promotion_outcome("CS1", &status);
        assert_eq!(exit, ExitStatus::DataError);
        assert!(message.contains("conflict"));
    }

    #[test]
    fn unexpected_result_shapes_fall_back_to_raw_text() {
        let status = TaskStatus {
            uuid: TaskHandle::new(Uuid::new_v4()),
            state: TaskState::Error,
            result: Some(Value::String("disk full".into())),
        };
        let (_, message) = promotion_outcome("CS1", &status);
        assert!(message.contains("disk full"));
    }

    #[tokio::test]
    async fn list_renders_the_environment_changesets() {
        let server = MockServer::start_async().await;
        mock_scope(&server);

        let ctx = context_for(&server);
        let exit = List
            .run(&ctx, &scoped_options(None))
            .await
            .expect("list succeeds");
        assert_eq!(exit, ExitStatus::Success);
    }

    #[tokio::test]
    async fn promote_polls_until_the_task_finishes() {
        let server = MockServer::start_async().await;
        mock_scope(&server);

        let uuid = Uuid::new_v4();
        let promote = server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/environments/2/changesets/7/promote");
            then.status(202)
                .header("content-type", "application/json")
                .json_body(json!({"uuid": uuid, "state": "running"}));
        });
        let poll = server.mock(|when, then| {
            when.method(GET).path(format!("/api/tasks/{uuid}"));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"uuid": uuid, "state": "finished"}));
        });

        let ctx = context_for(&server);
        let exit = Promote
            .run(&ctx, &scoped_options(Some("CS1")))
            .await
            .expect("promotion succeeds");
        assert_eq!(exit, ExitStatus::Success);
        promote.assert();
        poll.assert();
    }

    #[tokio::test]
    async fn promote_reports_a_failed_task_as_a_data_error() {
        let server = MockServer::start_async().await;
        mock_scope(&server);

        let uuid = Uuid::new_v4();
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/environments/2/changesets/7/promote");
            then.status(202)
                .header("content-type", "application/json")
                .json_body(json!({"uuid": uuid, "state": "running"}));
        });
        server.mock(|when, then| {
            when.method(GET).path(format!("/api/tasks/{uuid}"));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "uuid": uuid,
                    "state": "error",
                    "result": "{\"errors\":[\"conflict\"]}"
                }));
        });

        let ctx = context_for(&server);
        let exit = Promote
            .run(&ctx, &scoped_options(Some("CS1")))
            .await
            .expect("run completes");
        assert_eq!(exit, ExitStatus::DataError);
    }

    #[tokio::test]
    async fn update_binds_tagged_items_to_their_product() {
        let server = MockServer::start_async().await;
        mock_scope(&server);

        let update = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/organizations/ACME/environments/2/changesets/7")
                .json_body(json!({
                    "patch": {
                        "+packages": [{"name": "pg", "product": "db"}],
                        "-packages": [],
                        "+errata": [],
                        "-errata": [],
                        "+repos": [],
                        "-repos": [],
                        "+products": [],
                        "-products": []
                    }
                }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "id": 7,
                    "name": "CS1",
                    "updated_at": "2024-03-01T10:00:00Z",
                    "environment_id": 2
                }));
        });

        let mut options = scoped_options(Some("CS1"));
        options.set(
            "add_package",
            OptionValue::Tagged(vec![TaggedValue {
                value: "pg".into(),
                tag: "db".into(),
            }]),
        );

        let ctx = context_for(&server);
        let exit = Update.run(&ctx, &options).await.expect("update succeeds");
        assert_eq!(exit, ExitStatus::Success);
        update.assert();
    }

    #[tokio::test]
    async fn missing_changeset_is_a_not_found_error() {
        let server = MockServer::start_async().await;
        mock_scope(&server);

        let ctx = context_for(&server);
        let err = Delete
            .run(&ctx, &scoped_options(Some("ghost")))
            .await
            .expect_err("unknown changeset");
        assert!(matches!(
            err,
            CliError::NotFound(message) if message.contains("ghost")
        ));
    }
}
