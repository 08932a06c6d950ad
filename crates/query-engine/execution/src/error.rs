//! Errors for plan dispatch and backend execution.

use thiserror::Error;

/// A type for dispatch errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown output format '{0}'")]
    UnknownFormat(String),
    #[error("execution failed: {0}")]
    ExecutionFailure(#[source] BackendError),
}

/// A failure from the backend round-trip or from shaping its response.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned status {status}: {body}")]
    ErrorResponse { status: u16, body: String },
    #[error("backend response was not valid JSON: {0}")]
    InvalidResponse(#[source] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
    #[error("invalid backend request path '{0}'")]
    InvalidPath(String),
}
