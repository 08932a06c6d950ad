//! Pipe-delimited output, no header.

use async_trait::async_trait;

use query_engine_translation::QueryPlan;

use crate::client::SearchClient;
use crate::error::BackendError;
use crate::format::csv::plain;
use crate::format::rows::{self, ResultSet};
use crate::format::Formatter;

pub struct RawFormatter;

#[async_trait]
impl Formatter for RawFormatter {
    async fn execute(
        &self,
        plan: &QueryPlan,
        backend: &SearchClient,
    ) -> Result<String, BackendError> {
        let response = backend.execute(&plan.explain()).await?;
        let result = rows::from_response(plan, &response)?;
        Ok(render(&result))
    }
}

pub fn render(result: &ResultSet) -> String {
    result
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(plain)
                .collect::<Vec<String>>()
                .join("|")
        })
        .collect::<Vec<String>>()
        .join("\n")
}
