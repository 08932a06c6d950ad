//! The driver-oriented default format: column schema plus datarows.

use async_trait::async_trait;
use serde_json::{json, Value};

use query_engine_translation::QueryPlan;

use crate::client::SearchClient;
use crate::error::BackendError;
use crate::format::rows::{self, ResultSet};
use crate::format::Formatter;

pub struct JdbcFormatter;

#[async_trait]
impl Formatter for JdbcFormatter {
    async fn execute(
        &self,
        plan: &QueryPlan,
        backend: &SearchClient,
    ) -> Result<String, BackendError> {
        let response = backend.execute(&plan.explain()).await?;
        let result = rows::from_response(plan, &response)?;
        serde_json::to_string(&render(&result)).map_err(BackendError::InvalidResponse)
    }
}

pub fn render(result: &ResultSet) -> Value {
    let schema: Vec<Value> = result
        .columns
        .iter()
        .enumerate()
        .map(|(position, name)| {
            json!({
                "name": name,
                "type": column_type(result, position),
            })
        })
        .collect();

    json!({
        "schema": schema,
        "datarows": result.rows,
        "total": result.rows.len(),
        "size": result.rows.len(),
        "status": 200,
    })
}

/// Infer a column type from the first non-null value in the column.
fn column_type(result: &ResultSet, position: usize) -> &'static str {
    for row in &result.rows {
        match row.get(position) {
            Some(Value::Null) | None => continue,
            Some(Value::Bool(_)) => return "boolean",
            Some(Value::Number(number)) => {
                return if number.is_f64() { "double" } else { "long" };
            }
            Some(Value::String(_)) => return "text",
            Some(_) => return "object",
        }
    }
    "object"
}
