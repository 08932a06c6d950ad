//! Errors that occur while interpreting configuration.

use std::path::PathBuf;

use thiserror::Error;

/// The errors that can arise while parsing the configuration from disk.
#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error in {file_path} at line {line}, column {column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("backend URL must be specified in {file_path}")]
    EmptyBackendUri { file_path: PathBuf },
    #[error("{0}")]
    IoError(#[from] std::io::Error),
    #[error("{0}")]
    IoErrorButStringified(String),
}

/// The errors that can arise while writing the configuration to disk.
#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("{0}")]
    IoError(#[from] std::io::Error),
}

/// The errors that can arise while resolving a parsed configuration against
/// the environment.
#[derive(Debug, Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("missing environment variable when processing {file_path}: {message}")]
    MissingEnvironmentVariable { file_path: PathBuf, message: String },
}
