//! Health check endpoint for the server.

use query_engine_execution::{BackendError, SearchClient};

/// Check that the search cluster is reachable.
pub async fn health_check(client: &SearchClient) -> Result<(), BackendError> {
    client.ping().await
}
