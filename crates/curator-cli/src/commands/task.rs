//! Task actions: inspecting asynchronous server tasks.

use async_trait::async_trait;
use curator_api::{SystemTaskApi, TaskHandle};
use uuid::Uuid;

use crate::action::{Action, OptionSpec, ParsedOptions, ParserBuilder};
use crate::client::{AppContext, CliError, CliResult, ExitStatus};
use crate::command::Command;
use crate::output::Printer;
use crate::validate::Validator;

pub(crate) fn command() -> Command {
    Command::new("task", "status of asynchronous server tasks")
        .action("status", Box::new(Status))
}

pub(crate) struct Status;

#[async_trait]
impl Action for Status {
    fn description(&self) -> &'static str {
        "show the status of a system task"
    }

    fn configure(&self, parser: &mut ParserBuilder) {
        parser.opt(OptionSpec::value("uuid", "task uuid (required)"));
    }

    fn check_options(&self, validator: &mut Validator) {
        validator.require("uuid");
    }

    async fn run(&self, ctx: &AppContext, options: &ParsedOptions) -> CliResult<ExitStatus> {
        let raw = options.required("uuid")?;
        let uuid = Uuid::parse_str(raw)
            .map_err(|_| CliError::InvalidOption(format!("'{raw}' is not a valid task uuid")))?;

        // The strict endpoint: any server error, including "not found",
        // propagates immediately.
        let status = SystemTaskApi::new(&ctx.api)
            .status(TaskHandle::new(uuid))
            .await?;

        let mut printer = Printer::new(ctx.output);
        printer
            .add_column("uuid", "UUID")
            .add_column("state", "State")
            .add_multiline_column("result", "Result");
        printer.set_header("Task Status");
        printer.print_item(&status)?;
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

    fn options_with_uuid(raw: &str) -> ParsedOptions {
        let mut options = ParsedOptions::default();
        options.set("uuid", OptionValue::Str(raw.to_string()));
        options
    }

    #[tokio::test]
    async fn malformed_uuids_fail_before_any_call() {
        let server = MockServer::start_async().await;
        let ctx = context_for(&server);
        let err = Status
            .run(&ctx, &options_with_uuid("not-a-uuid"))
            .await
            .expect_err("invalid uuid");
        assert!(matches!(err, CliError::InvalidOption(_)));
    }

    #[tokio::test]
    async fn strict_endpoint_errors_propagate_to_the_user() {
        let server = MockServer::start_async().await;
        let uuid = Uuid::new_v4();
        server.mock(|when, then| {
            when.method(GET).path(format!("/api/systems/tasks/{uuid}"));
            then.status(404)
                .header("content-type", "application/json")
                .json_body(json!({"displayMessage": "task gone"}));
        });

        let ctx = context_for(&server);
        let err = Status
            .run(&ctx, &options_with_uuid(&uuid.to_string()))
            .await
            .expect_err("strict endpoint error");
        assert!(matches!(
            err,
            CliError::NotFound(message) if message.contains("task gone")
        ));
    }

    #[tokio::test]
    async fn prints_the_task_record() {
        let server = MockServer::start_async().await;
        let uuid = Uuid::new_v4();
        server.mock(|when, then| {
            when.method(GET).path(format!("/api/systems/tasks/{uuid}"));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"uuid": uuid, "state": "running"}));
        });

        let ctx = context_for(&server);
        let exit = Status
            .run(&ctx, &options_with_uuid(&uuid.to_string()))
            .await
            .expect("status fetched");
        assert_eq!(exit, ExitStatus::Success);
    }
}
