//! CLI error taxonomy, exit statuses, and per-invocation context.

use curator_api::{ApiClient, ApiError, StatusCode};
use thiserror::Error;

use crate::output::OutputFormat;

/// Process exit status of a completed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitStatus {
    /// The action completed.
    Success,
    /// The request was understood but the data was wrong or missing.
    DataError,
    /// The server failed or could not be reached.
    ServerError,
}

impl ExitStatus {
    pub(crate) const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::DataError => 2,
            Self::ServerError => 3,
        }
    }
}

/// CLI-level error type distinguishing the failure classes an action can
/// surface. Every variant produces a printed message; none is silent.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// One or more required options were not supplied.
    #[error("required options missing: {}", flags.join(", "))]
    MissingOptions {
        /// Flag clauses to report, one per failed rule.
        flags: Vec<String>,
    },
    /// An option value or combination violated a declared constraint.
    #[error("{0}")]
    InvalidOption(String),
    /// A command, action, or server-side entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The server answered with an error.
    #[error("{0}")]
    Server(String),
    /// The user interrupted a running operation.
    #[error("interrupted")]
    Interrupted,
    /// A local operational failure outside the taxonomy above.
    #[error(transparent)]
    Failure(#[from] anyhow::Error),
}

/// Convenience alias for CLI results.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::MissingOptions { .. } | Self::InvalidOption(_) | Self::NotFound(_) => {
                ExitStatus::DataError.code()
            }
            Self::Server(_) | Self::Failure(_) => ExitStatus::ServerError.code(),
            Self::Interrupted => 130,
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } if status == StatusCode::NOT_FOUND => {
                Self::NotFound(message)
            }
            other => Self::Server(other.to_string()),
        }
    }
}

/// Context passed to every action invocation.
pub(crate) struct AppContext {
    /// Shared API client, built once from the loaded configuration.
    pub(crate) api: ApiClient,
    /// Output format selected for this invocation.
    pub(crate) output: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_api::StatusCode;

    #[test]
    fn exit_codes_map_to_posix_classes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(
            CliError::MissingOptions { flags: vec!["--org".into()] }.exit_code(),
            ExitStatus::DataError.code()
        );
        assert_eq!(
            CliError::Server("boom".into()).exit_code(),
            ExitStatus::ServerError.code()
        );
        assert_eq!(CliError::Interrupted.exit_code(), 130);
    }

    #[test]
    fn api_not_found_becomes_data_error() {
        let err = CliError::from(ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: "no such changeset".into(),
        });
        assert!(matches!(err, CliError::NotFound(message) if message == "no such changeset"));
    }

    #[test]
    fn api_server_errors_keep_their_message() {
        let err = CliError::from(ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "index corrupted".into(),
        });
        assert!(matches!(err, CliError::Server(message) if message.contains("index corrupted")));
    }
}
