//! Output formatters.
//!
//! Each formatter executes a query plan against the backend and renders the
//! response in one specific output format. The recognized set is closed:
//! `jdbc` (the default), `json`, `csv` and `raw`.

pub mod csv;
pub mod jdbc;
pub mod json;
pub mod raw;
pub mod rows;

use async_trait::async_trait;

use query_engine_translation::QueryPlan;

use crate::client::SearchClient;
use crate::error::BackendError;

/// A capability that executes a plan and renders the result in one format.
#[async_trait]
pub trait Formatter: Send + Sync {
    async fn execute(
        &self,
        plan: &QueryPlan,
        backend: &SearchClient,
    ) -> Result<String, BackendError>;
}
