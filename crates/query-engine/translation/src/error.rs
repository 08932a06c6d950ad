//! Errors for SQL compilation.

use thiserror::Error;

/// A type for compilation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("failed to parse SQL near '{0}'")]
    ParseFailure(String),
    #[error("{0} are not supported")]
    UnsupportedFeature(String),
}
