//! Resolve a parsed configuration into a runtime configuration.

use std::path::PathBuf;

use crate::configuration::Configuration;
use crate::environment::Environment;
use crate::error::MakeRuntimeConfigurationError;
use crate::values::{BackendUri, Secret};
use crate::version1::{ParsedConfiguration, CONFIGURATION_FILENAME};

/// Resolve the secrets in a parsed configuration against the environment.
pub fn make_runtime_configuration(
    parsed: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let backend_url = match parsed.backend_url {
        BackendUri(Secret::Plain(url)) => url,
        BackendUri(Secret::FromEnvironment { variable }) => {
            environment.read(&variable).map_err(|err| {
                MakeRuntimeConfigurationError::MissingEnvironmentVariable {
                    file_path: PathBuf::from(CONFIGURATION_FILENAME),
                    message: err.to_string(),
                }
            })?
        }
    };
    Ok(Configuration { backend_url })
}
