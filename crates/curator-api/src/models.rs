//! Wire models shared by the endpoint wrappers and the CLI.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A deployment stage within an organization's content lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    /// Server-side identifier.
    pub id: u64,
    /// Environment name, unique within the organization.
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A named bundle of content changes staged for promotion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Changeset {
    /// Server-side identifier.
    pub id: u64,
    /// Changeset name, unique within its environment.
    pub name: String,
    /// Lifecycle state reported by the server.
    #[serde(default)]
    pub state: Option<String>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Environment the changeset belongs to.
    pub environment_id: u64,
    /// Environment name when the server includes it.
    #[serde(default)]
    pub environment_name: Option<String>,
    /// Package members.
    #[serde(default)]
    pub packages: Vec<MemberRef>,
    /// Erratum members.
    #[serde(default)]
    pub errata: Vec<MemberRef>,
    /// Repository members.
    #[serde(default)]
    pub repos: Vec<MemberRef>,
    /// Product members.
    #[serde(default)]
    pub products: Vec<ProductRef>,
}

/// A changeset member identified by its display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRef {
    /// Human-readable member name.
    pub display_name: String,
}

/// A product referenced from a changeset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    /// Product name.
    pub name: String,
}

/// A content view or content-view definition.
///
/// The server exposes published views and unpublished definitions through
/// separate endpoints but with one record shape; the CLI lists them side by
/// side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentView {
    /// Server-side identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Unique label used to address the view on the CLI.
    pub label: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Owning organization name.
    #[serde(default)]
    pub organization: Option<String>,
    /// Environments the view is promoted into.
    #[serde(default)]
    pub environments: Vec<String>,
    /// Whether the record is a published view.
    #[serde(default)]
    pub published: Option<bool>,
}

/// A content-view filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    /// Server-side identifier.
    pub id: u64,
    /// Filter name.
    pub name: String,
}

/// A product in the organization's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Server-side identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Unique label.
    pub label: String,
}

/// A repository within a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repo {
    /// Server-side identifier.
    pub id: u64,
    /// Repository name.
    pub name: String,
}

/// Opaque identifier of a server-tracked asynchronous task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskHandle(Uuid);

impl TaskHandle {
    /// Wrap a raw task UUID.
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for TaskHandle {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, formatter)
    }
}

/// Lifecycle state of a server task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Queued, not yet started.
    Waiting,
    /// Currently executing.
    Running,
    /// Completed successfully.
    Finished,
    /// Completed with an error.
    Error,
}

impl TaskState {
    /// Whether the task has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Error)
    }
}

/// Status snapshot of a server task, with its result payload untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Task identifier.
    pub uuid: TaskHandle,
    /// Current lifecycle state.
    pub state: TaskState,
    /// Opaque result payload; interpreted by the caller, never the poller.
    #[serde(default)]
    pub result: Option<Value>,
}

impl TaskStatus {
    /// Handle used to poll this task.
    #[must_use]
    pub const fn handle(&self) -> TaskHandle {
        self.uuid
    }
}
