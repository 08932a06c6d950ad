//! Transient state used by the server.
//!
//! This is initialized on startup.

use thiserror::Error;

use query_engine_execution::metrics;
use query_engine_execution::{Dispatcher, SearchClient};
use searchql_configuration::Configuration;

/// State for our server.
pub struct State {
    pub metrics: metrics::Metrics,
    pub client: SearchClient,
    pub dispatcher: Dispatcher,
}

/// Create a backend client and wrap it inside a server State.
pub fn create_state(
    configuration: &Configuration,
    metrics_registry: &mut prometheus::Registry,
) -> Result<State, InitializationError> {
    let metrics = metrics::initialise_metrics(metrics_registry)
        .map_err(InitializationError::MetricsError)?;

    let base_url = url::Url::parse(&configuration.backend_url)
        .map_err(|err| InitializationError::InvalidBackendUrl(err.to_string()))?;

    Ok(State {
        metrics,
        client: SearchClient::new(base_url),
        dispatcher: Dispatcher::new(),
    })
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("error initializing metrics: {0}")]
    MetricsError(prometheus::Error),
    #[error("invalid backend url: {0}")]
    InvalidBackendUrl(String),
}
