//! Entry point, command/action resolution, and dispatch.
//!
//! Control flow per invocation: resolve `(command, action)` against the
//! registry, build the action's parser, parse, validate requirements,
//! build the invocation context, then run. Validation failures abort
//! before configuration or the network is touched.

use std::io::{self, IsTerminal};
use std::path::Path;

use curator_api::ApiClient;
use curator_config::ClientConfig;
use tracing_subscriber::EnvFilter;

use crate::action::{OptionSpec, ParseOutcome, ParsedOptions, ParserBuilder};
use crate::client::{AppContext, CliError, CliResult, ExitStatus};
use crate::command::Registry;
use crate::commands;
use crate::output::OutputFormat;
use crate::validate::Validator;

/// Install the global tracing subscriber. Call once, before [`run`].
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Parse argv, execute the requested action, and return the process exit
/// code.
pub async fn run() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();
    run_with_args(args).await
}

pub(crate) async fn run_with_args(args: Vec<String>) -> i32 {
    let registry = commands::registry();

    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{}", registry.usage());
        return ExitStatus::DataError.code();
    };
    if matches!(command, "help" | "--help" | "-h") {
        println!("{}", registry.usage());
        return ExitStatus::Success.code();
    }

    match args.get(1).map(String::as_str) {
        None => match registry.command_usage(command) {
            Ok(text) => {
                eprintln!("{text}");
                ExitStatus::DataError.code()
            }
            Err(err) => report(&err),
        },
        Some("help" | "--help" | "-h") => match registry.command_usage(command) {
            Ok(text) => {
                println!("{text}");
                ExitStatus::Success.code()
            }
            Err(err) => report(&err),
        },
        Some(action) => match execute(&registry, command, action, &args[2..]).await {
            Ok(status) => status.code(),
            Err(err) => report(&err),
        },
    }
}

fn report(err: &CliError) -> i32 {
    eprintln!("error: {err}");
    err.exit_code()
}

async fn execute(
    registry: &Registry,
    command: &str,
    action: &str,
    rest: &[String],
) -> CliResult<ExitStatus> {
    let action_impl = registry.resolve(command, action)?;

    let mut parser = ParserBuilder::new(
        format!("curator {command} {action}"),
        action_impl.description(),
    );
    add_global_options(&mut parser);
    action_impl.configure(&mut parser);

    let options = match parser.parse(rest)? {
        ParseOutcome::Help(text) => {
            println!("{text}");
            return Ok(ExitStatus::Success);
        }
        ParseOutcome::Options(options) => options,
    };

    let mut validator = Validator::new();
    action_impl.check_options(&mut validator);
    validator.validate(&options)?;

    let ctx = build_context(&options)?;
    action_impl.run(&ctx, &options).await
}

/// Options the host adds to every action's parser.
fn add_global_options(parser: &mut ParserBuilder) {
    parser
        .opt(OptionSpec::value(
            "config",
            "path to an alternate configuration file",
        ))
        .opt(
            OptionSpec::value("output", "output format: table or json").with_aliases(&["format"]),
        );
}

fn build_context(options: &ParsedOptions) -> CliResult<AppContext> {
    let output = match options.get_str("output") {
        Some(value) => OutputFormat::parse(value)?,
        None => OutputFormat::default(),
    };

    let path = options.get_str("config").map(Path::new);
    let mut config = ClientConfig::load(path).map_err(CliError::failure)?;
    resolve_password(&mut config)?;

    let api = ApiClient::new(&config)?;
    Ok(AppContext { api, output })
}

/// Prompt for the account password when the configuration names a user
/// but carries no password and we are attached to a terminal.
fn resolve_password(config: &mut ClientConfig) -> CliResult<()> {
    if config.credentials.username.is_some()
        && config.credentials.password.is_none()
        && io::stdin().is_terminal()
    {
        let password = rpassword::prompt_password("Password: ").map_err(CliError::failure)?;
        let trimmed = password.trim();
        if !trimmed.is_empty() {
            config.credentials.password = Some(trimmed.to_string());
        }
    }
    Ok(())
}
