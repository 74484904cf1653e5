//! Typed errors for API calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Primary error type for REST calls against the server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// Source client-builder error.
        source: reqwest::Error,
    },
    /// The configured locale cannot be sent as a header value.
    #[error("configured locale '{value}' is not a valid header value")]
    InvalidLocale {
        /// Locale payload from the configuration.
        value: String,
    },
    /// A request path did not join onto the configured base URL.
    #[error("invalid request path '{path}': {source}")]
    InvalidUrl {
        /// Offending path.
        path: String,
        /// Source parse error.
        source: url::ParseError,
    },
    /// The request could not be sent or the connection failed.
    #[error("request to {path} failed: {source}")]
    Request {
        /// Path the request targeted.
        path: String,
        /// Source transport error.
        source: reqwest::Error,
    },
    /// The server answered with a non-2xx status.
    #[error("{message} (status {status})")]
    Status {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Server-provided message, or a fallback description.
        message: String,
    },
    /// A 2xx response body could not be decoded.
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        /// Path the request targeted.
        path: String,
        /// Source decode error.
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Whether this error is a "not found"-class server response.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Convenience alias for API results.
pub type ApiResult<T> = Result<T, ApiError>;
