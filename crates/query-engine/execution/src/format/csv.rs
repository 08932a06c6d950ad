//! Tabular CSV output: one header line, one line per row.

use async_trait::async_trait;
use serde_json::Value;

use query_engine_translation::QueryPlan;

use crate::client::SearchClient;
use crate::error::BackendError;
use crate::format::rows::{self, ResultSet};
use crate::format::Formatter;

pub struct CsvFormatter;

#[async_trait]
impl Formatter for CsvFormatter {
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
    let mut lines = vec![result
        .columns
        .iter()
        .map(|column| escape(column))
        .collect::<Vec<String>>()
        .join(",")];
    for row in &result.rows {
        lines.push(
            row.iter()
                .map(|value| escape(&plain(value)))
                .collect::<Vec<String>>()
                .join(","),
        );
    }
    lines.join("\n")
}

/// Render one cell value without JSON quoting.
pub fn plain(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
