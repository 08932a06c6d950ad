//! Shaping of backend responses into a flat column/row result set.

use serde_json::Value;

use query_engine_translation::plan::{AggregateFunction, AggregatePlan};
use query_engine_translation::QueryPlan;

use crate::error::BackendError;

/// A flat view of a backend response, shared by the tabular formatters.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Flatten a backend response according to the plan that produced it.
pub fn from_response(plan: &QueryPlan, response: &Value) -> Result<ResultSet, BackendError> {
    match plan {
        QueryPlan::Search(search) => search_rows(&search.fields, response),
        QueryPlan::Aggregate(aggregate) => aggregate_rows(aggregate, response),
        QueryPlan::Delete(_) => delete_rows(response),
        QueryPlan::Show(_) => show_rows(response),
        QueryPlan::Describe(_) => describe_rows(response),
    }
}

fn search_rows(fields: &[String], response: &Value) -> Result<ResultSet, BackendError> {
    let hits = response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| shape("missing hits.hits"))?;

    // selected fields keep their projection order; otherwise take columns in
    // first-seen order across all hits
    let columns: Vec<String> = if fields.is_empty() {
        let mut seen = vec![];
        for hit in hits {
            if let Some(Value::Object(source)) = hit.get("_source") {
                for key in source.keys() {
                    if !seen.contains(key) {
                        seen.push(key.clone());
                    }
                }
            }
        }
        seen
    } else {
        fields.to_vec()
    };

    let rows = hits
        .iter()
        .map(|hit| {
            let source = hit.get("_source");
            columns
                .iter()
                .map(|column| {
                    source
                        .and_then(|fields| fields.get(column))
                        .cloned()
                        .unwrap_or(Value::Null)
                })
                .collect()
        })
        .collect();

    Ok(ResultSet { columns, rows })
}

fn aggregate_rows(plan: &AggregatePlan, response: &Value) -> Result<ResultSet, BackendError> {
    let mut columns = plan.group_by.clone();
    columns.extend(plan.metrics.iter().map(|metric| metric.label()));

    if plan.group_by.is_empty() {
        let row = plan
            .metrics
            .iter()
            .map(|metric| {
                if is_count_star(metric) {
                    total_hits(response)
                } else {
                    response
                        .pointer(&format!("/aggregations/{}/value", metric.label()))
                        .cloned()
                        .ok_or_else(|| shape(format!("missing aggregation '{}'", metric.label())))
                }
            })
            .collect::<Result<Vec<Value>, BackendError>>()?;
        return Ok(ResultSet {
            columns,
            rows: vec![row],
        });
    }

    let mut rows = vec![];
    collect_buckets(plan, response, 0, &mut vec![], &mut rows)?;
    Ok(ResultSet { columns, rows })
}

/// Walk the nested terms buckets, one level per grouped column, emitting one
/// row per innermost bucket.
fn collect_buckets(
    plan: &AggregatePlan,
    level_value: &Value,
    level: usize,
    keys: &mut Vec<Value>,
    rows: &mut Vec<Vec<Value>>,
) -> Result<(), BackendError> {
    let field = &plan.group_by[level];
    let buckets = level_value
        .pointer(&format!("/aggregations/{field}/buckets"))
        .or_else(|| level_value.pointer(&format!("/{field}/buckets")))
        .and_then(Value::as_array)
        .ok_or_else(|| shape(format!("missing buckets for '{field}'")))?;

    for bucket in buckets {
        keys.push(bucket.get("key").cloned().unwrap_or(Value::Null));
        if level + 1 < plan.group_by.len() {
            collect_buckets(plan, bucket, level + 1, keys, rows)?;
        } else {
            let mut row = keys.clone();
            for metric in &plan.metrics {
                let value = if is_count_star(metric) {
                    bucket.get("doc_count").cloned().unwrap_or(Value::Null)
                } else {
                    bucket
                        .pointer(&format!("/{}/value", metric.label()))
                        .cloned()
                        .unwrap_or(Value::Null)
                };
                row.push(value);
            }
            rows.push(row);
        }
        keys.pop();
    }
    Ok(())
}

fn delete_rows(response: &Value) -> Result<ResultSet, BackendError> {
    let deleted = response
        .get("deleted")
        .cloned()
        .ok_or_else(|| shape("missing deleted count"))?;
    Ok(ResultSet {
        columns: vec!["deleted".to_string()],
        rows: vec![vec![deleted]],
    })
}

fn show_rows(response: &Value) -> Result<ResultSet, BackendError> {
    let indices = response
        .as_object()
        .ok_or_else(|| shape("mapping response is not an object"))?;
    Ok(ResultSet {
        columns: vec!["table".to_string()],
        rows: indices
            .keys()
            .map(|name| vec![Value::String(name.clone())])
            .collect(),
    })
}

fn describe_rows(response: &Value) -> Result<ResultSet, BackendError> {
    let indices = response
        .as_object()
        .ok_or_else(|| shape("mapping response is not an object"))?;
    let mut rows = vec![];
    for (index, mapping) in indices {
        let properties = mapping
            .pointer("/mappings/properties")
            .and_then(Value::as_object)
            .ok_or_else(|| shape(format!("missing mapping properties for '{index}'")))?;
        for (column, description) in properties {
            let type_ = description.get("type").cloned().unwrap_or(Value::Null);
            rows.push(vec![
                Value::String(index.clone()),
                Value::String(column.clone()),
                type_,
            ]);
        }
    }
    Ok(ResultSet {
        columns: vec!["table".to_string(), "column".to_string(), "type".to_string()],
        rows,
    })
}

fn is_count_star(metric: &query_engine_translation::plan::AggregateCall) -> bool {
    metric.function == AggregateFunction::Count && metric.field == "*"
}

/// The total hit count, tolerating both the object form and the bare number
/// older backends report.
fn total_hits(response: &Value) -> Result<Value, BackendError> {
    let total = response
        .pointer("/hits/total")
        .ok_or_else(|| shape("missing hits.total"))?;
    match total {
        Value::Object(object) => object
            .get("value")
            .cloned()
            .ok_or_else(|| shape("missing hits.total.value")),
        Value::Number(_) => Ok(total.clone()),
        _ => Err(shape("hits.total is neither object nor number")),
    }
}

fn shape(detail: impl Into<String>) -> BackendError {
    BackendError::UnexpectedShape(detail.into())
}
