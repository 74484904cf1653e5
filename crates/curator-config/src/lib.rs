#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Client configuration for the curator CLI.
//!
//! Configuration is loaded once at startup from an optional TOML file plus
//! environment-variable overrides, and is read-only afterwards.
//!
//! Layout: `model.rs` (typed config model and defaults), `loader.rs` (file
//! and environment resolution), `error.rs` (error taxonomy).

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use model::{ClientConfig, Credentials, ServerConfig};
