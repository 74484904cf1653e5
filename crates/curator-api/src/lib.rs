#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Stateless REST wrappers for the content-management server API.
//!
//! Layout:
//! - `client.rs`: shared HTTP client, auth headers, response classification
//! - `models.rs`: wire models (changesets, content views, environments, tasks)
//! - `changeset.rs`, `content_view.rs`, `environment.rs`, `catalog.rs`,
//!   `task.rs`: per-entity endpoint wrappers
//! - `error.rs`: typed API errors

pub mod catalog;
pub mod changeset;
pub mod client;
pub mod content_view;
pub mod environment;
pub mod error;
pub mod models;
pub mod task;

pub use changeset::{ChangesetApi, ContentPatch, PatchItem};
pub use catalog::{FilterApi, ProductApi, RepoApi};
pub use client::ApiClient;
pub use content_view::{ContentViewApi, ContentViewDefinitionApi};
pub use environment::EnvironmentApi;
pub use error::{ApiError, ApiResult};
pub use models::{
    Changeset, ContentView, Environment, Filter, MemberRef, Product, ProductRef, Repo, TaskHandle,
    TaskState, TaskStatus,
};
pub use reqwest::StatusCode;
pub use task::{SystemTaskApi, TaskApi};
