//! Raw backend response passthrough.

use async_trait::async_trait;

use query_engine_translation::QueryPlan;

use crate::client::SearchClient;
use crate::error::BackendError;
use crate::format::Formatter;

pub struct JsonFormatter;

#[async_trait]
impl Formatter for JsonFormatter {
    async fn execute(
        &self,
        plan: &QueryPlan,
        backend: &SearchClient,
    ) -> Result<String, BackendError> {
        let response = backend.execute(&plan.explain()).await?;
        serde_json::to_string(&response).map_err(BackendError::InvalidResponse)
    }
}
