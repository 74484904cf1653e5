//! Async task poller.
//!
//! Turns a task handle into a terminal status by polling one of the two
//! status endpoints. The endpoints have deliberately different error
//! contracts (see `curator_api::task`); the poller honors whichever
//! contract its source implements and adds no retry of its own.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use curator_api::{ApiError, SystemTaskApi, TaskApi, TaskHandle, TaskStatus};
use tokio::time::sleep;

use crate::client::{CliError, CliResult};
use crate::spinner::Spinner;

/// A pollable view of one task-status endpoint.
///
/// `Ok(None)` means "no status yet, ask again"; an error is final and is
/// propagated without further polling.
#[async_trait]
pub(crate) trait StatusSource: Send + Sync {
    async fn poll(&self, handle: TaskHandle) -> Result<Option<TaskStatus>, ApiError>;
}

#[async_trait]
impl StatusSource for TaskApi<'_> {
    async fn poll(&self, handle: TaskHandle) -> Result<Option<TaskStatus>, ApiError> {
        self.status(handle).await
    }
}

#[async_trait]
impl StatusSource for SystemTaskApi<'_> {
    async fn poll(&self, handle: TaskHandle) -> Result<Option<TaskStatus>, ApiError> {
        self.status(handle).await.map(Some)
    }
}

/// Tuning knobs for one poll loop.
pub(crate) struct PollOptions {
    pub(crate) interval: Duration,
    pub(crate) message: Option<String>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            message: None,
        }
    }
}

impl PollOptions {
    /// Default cadence with a spinner message alongside the poll loop.
    pub(crate) fn with_message(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Self::default()
        }
    }
}

/// Poll until the task reaches a terminal state, aborting on ctrl-c.
pub(crate) async fn wait_for_task<S: StatusSource>(
    source: &S,
    handle: TaskHandle,
    options: PollOptions,
) -> CliResult<TaskStatus> {
    wait_with_cancel(source, handle, options, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Poll until the task reaches a terminal state or `cancel` completes.
///
/// The spinner, when configured, is stopped and joined on every exit path
/// before the result is returned.
pub(crate) async fn wait_with_cancel<S, F>(
    source: &S,
    handle: TaskHandle,
    options: PollOptions,
    cancel: F,
) -> CliResult<TaskStatus>
where
    S: StatusSource,
    F: Future<Output = ()> + Send,
{
    let spinner = options.message.as_deref().map(Spinner::start);
    let result = tokio::select! {
        result = poll_until_terminal(source, handle, options.interval) => result,
        () = cancel => Err(CliError::Interrupted),
    };
    if let Some(spinner) = spinner {
        spinner.stop().await;
    }
    result
}

async fn poll_until_terminal<S: StatusSource>(
    source: &S,
    handle: TaskHandle,
    interval: Duration,
) -> CliResult<TaskStatus> {
    loop {
        if let Some(status) = source.poll(handle).await? {
            if status.state.is_terminal() {
                return Ok(status);
            }
        }
        sleep(interval).await;
    }
}
