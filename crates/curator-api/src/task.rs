//! Task-status endpoints.
//!
//! The two endpoints are intentionally asymmetric and must stay that way:
//! [`TaskApi`] swallows "not found" responses and reports "no status yet",
//! while [`SystemTaskApi`] propagates every error to the caller.

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{TaskHandle, TaskStatus};

/// Lenient task-status endpoint.
///
/// Used by poll loops that may start before the server has recorded the
/// task: a "not found" answer means "ask again later", not failure.
#[derive(Debug, Clone, Copy)]
pub struct TaskApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TaskApi<'a> {
    /// Bind the wrapper to a client.
    #[must_use]
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the status of a task, or `None` when the server has no status
    /// for it yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails for any reason other
    /// than "not found".
    pub async fn status(&self, handle: TaskHandle) -> ApiResult<Option<TaskStatus>> {
        match self.client.get(&format!("/api/tasks/{handle}")).await {
            Ok(status) => Ok(Some(status)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Strict task-status endpoint for system-scoped tasks.
#[derive(Debug, Clone, Copy)]
pub struct SystemTaskApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SystemTaskApi<'a> {
    /// Bind the wrapper to a client.
    #[must_use]
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the status of a system task, propagating every server error.
    ///
    /// # Errors
    ///
    /// Returns an error when the server call fails, including "not found".
    pub async fn status(&self, handle: TaskHandle) -> ApiResult<TaskStatus> {
        self.client
            .get(&format!("/api/systems/tasks/{handle}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_config::ClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    fn client_for(server: &MockServer) -> ApiClient {
        let mut config = ClientConfig::default();
        config.server.url = server.base_url().parse().expect("valid URL");
        ApiClient::new(&config).expect("build client")
    }

    #[tokio::test]
    async fn lenient_endpoint_maps_not_found_to_none() {
        let server = MockServer::start_async().await;
        let handle = TaskHandle::new(Uuid::new_v4());
        server.mock(|when, then| {
            when.method(GET).path(format!("/api/tasks/{handle}"));
            then.status(404);
        });

        let client = client_for(&server);
        let status = TaskApi::new(&client).status(handle).await.expect("lenient");
        assert!(status.is_none());
    }

    #[tokio::test]
    async fn lenient_endpoint_propagates_hard_errors() {
        let server = MockServer::start_async().await;
        let handle = TaskHandle::new(Uuid::new_v4());
        server.mock(|when, then| {
            when.method(GET).path(format!("/api/tasks/{handle}"));
            then.status(500);
        });

        let client = client_for(&server);
        let err = TaskApi::new(&client)
            .status(handle)
            .await
            .expect_err("hard error");
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn strict_endpoint_propagates_not_found() {
        let server = MockServer::start_async().await;
        let handle = TaskHandle::new(Uuid::new_v4());
        server.mock(|when, then| {
            when.method(GET).path(format!("/api/systems/tasks/{handle}"));
            then.status(404);
        });

        let client = client_for(&server);
        let err = SystemTaskApi::new(&client)
            .status(handle)
            .await
            .expect_err("strict endpoint fails");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn strict_endpoint_decodes_status() {
        let server = MockServer::start_async().await;
        let uuid = Uuid::new_v4();
        let handle = TaskHandle::new(uuid);
        server.mock(|when, then| {
            when.method(GET).path(format!("/api/systems/tasks/{handle}"));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"uuid": uuid, "state": "finished"}));
        });

        let client = client_for(&server);
        let status = SystemTaskApi::new(&client)
            .status(handle)
            .await
            .expect("status");
        assert_eq!(status.handle(), handle);
    }
}
