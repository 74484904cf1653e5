//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The configuration file was not valid TOML.
    #[error("failed to parse configuration file {path}")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Source TOML error.
        source: toml::de::Error,
    },
    /// A server URL override was not a valid URL.
    #[error("invalid server URL '{value}'")]
    InvalidUrl {
        /// URL payload provided by the caller.
        value: String,
        /// Source parse error.
        source: url::ParseError,
    },
    /// A timeout override was not a positive integer.
    #[error("invalid timeout '{value}' (expected seconds)")]
    InvalidTimeout {
        /// Timeout payload provided by the caller.
        value: String,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
