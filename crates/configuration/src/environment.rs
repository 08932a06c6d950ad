//! Sources of environment variables.

use std::collections::HashMap;

use thiserror::Error;

/// A source the configuration can read environment variables from. Tests use
/// a `HashMap`; the server binary uses the process environment.
pub trait Environment {
    fn read(&self, variable: &str) -> Result<String, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("environment variable '{0}' is not set")]
    VariableNotPresent(String),
    #[error("environment variable '{0}' is not valid unicode")]
    NonUnicodeValue(String),
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn read(&self, variable: &str) -> Result<String, Error> {
        std::env::var(variable).map_err(|err| match err {
            std::env::VarError::NotPresent => Error::VariableNotPresent(variable.to_string()),
            std::env::VarError::NotUnicode(_) => Error::NonUnicodeValue(variable.to_string()),
        })
    }
}

impl Environment for HashMap<String, String> {
    fn read(&self, variable: &str) -> Result<String, Error> {
        self.get(variable)
            .cloned()
            .ok_or_else(|| Error::VariableNotPresent(variable.to_string()))
    }
}

impl<E: Environment> Environment for &E {
    fn read(&self, variable: &str) -> Result<String, Error> {
        (*self).read(variable)
    }
}
