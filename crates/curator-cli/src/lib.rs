#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Command-line client for a content-management server.
//!
//! Layout:
//! - `cli.rs`: entry point, command/action resolution, dispatch
//! - `action.rs`: declarative option specs, parsing, the `Action` contract
//! - `validate.rs`: required-option validation
//! - `command.rs`: named action groups and the dispatch registry
//! - `task.rs`: async task poller
//! - `spinner.rs`: background progress indicator
//! - `output.rs`: record and table printing
//! - `client.rs`: CLI error taxonomy and per-invocation context
//! - `commands/`: per-entity actions (changesets, content views, tasks)
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod action;
pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod command;
pub(crate) mod commands;
pub(crate) mod output;
pub(crate) mod spinner;
pub(crate) mod task;
pub(crate) mod validate;

pub use cli::{init_logging, run};
