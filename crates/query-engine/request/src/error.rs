//! Errors for request normalization and parameter binding.

use thiserror::Error;

use crate::bind::ParameterType;

/// Errors raised while binding parameters into a SQL template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("placeholder count ({placeholders}) does not match parameter count ({parameters})")]
    Mismatch {
        placeholders: usize,
        parameters: usize,
    },
    #[error("parameter value '{value}' cannot be read as {expected}")]
    TypeCoercion {
        value: String,
        expected: ParameterType,
    },
}

/// Errors raised while normalizing a raw request into an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("{0}")]
    Binding(#[from] BindError),
    #[error("malformed request envelope: {0}")]
    MalformedEnvelope(String),
}
