//! Definition of query plans and their rendering as backend requests.

use serde_json::{json, Map, Value};

/// The compiled, executable representation of a SQL statement. Each variant
/// carries the canonical SQL it was compiled from so downstream stages can
/// re-derive context without re-parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    Search(SearchPlan),
    Aggregate(AggregatePlan),
    Delete(DeletePlan),
    Show(ShowPlan),
    Describe(DescribePlan),
}

/// A plain search over one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    pub sql: String,
    pub index: String,
    /// Selected source fields; empty means all.
    pub fields: Vec<String>,
    pub filter: Option<String>,
    pub sort: Vec<(String, SortOrder)>,
    pub limit: Option<u64>,
}

/// An aggregation query: bucket terms for each grouped column, metric
/// aggregations at the innermost level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatePlan {
    pub sql: String,
    pub index: String,
    pub group_by: Vec<String>,
    pub metrics: Vec<AggregateCall>,
    pub filter: Option<String>,
}

/// A delete-by-query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    pub sql: String,
    pub index: String,
    pub filter: Option<String>,
}

/// An index listing (SHOW TABLES).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowPlan {
    pub sql: String,
    pub pattern: String,
}

/// A mapping lookup for one index (DESCRIBE).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribePlan {
    pub sql: String,
    pub index: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One aggregate function application from the projection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCall {
    pub function: AggregateFunction,
    /// The argument column; `*` only for COUNT.
    pub field: String,
}

impl AggregateCall {
    /// The column name this call is reported under, e.g. `COUNT(*)`.
    pub fn label(&self) -> String {
        format!("{}({})", self.function, self.field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl std::fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        };
        write!(f, "{name}")
    }
}

/// A single request against the search backend, ready to be sent by the
/// backend client.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl QueryPlan {
    /// The canonical SQL this plan was compiled from.
    pub fn sql(&self) -> &str {
        match self {
            QueryPlan::Search(plan) => &plan.sql,
            QueryPlan::Aggregate(plan) => &plan.sql,
            QueryPlan::Delete(plan) => &plan.sql,
            QueryPlan::Show(plan) => &plan.sql,
            QueryPlan::Describe(plan) => &plan.sql,
        }
    }

    /// A short name for the plan variant, used in spans and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryPlan::Search(_) => "search",
            QueryPlan::Aggregate(_) => "aggregate",
            QueryPlan::Delete(_) => "delete",
            QueryPlan::Show(_) => "show",
            QueryPlan::Describe(_) => "describe",
        }
    }

    /// Render the backend request for this plan.
    pub fn explain(&self) -> BackendRequest {
        match self {
            QueryPlan::Search(plan) => plan.explain(),
            QueryPlan::Aggregate(plan) => plan.explain(),
            QueryPlan::Delete(plan) => plan.explain(),
            QueryPlan::Show(plan) => plan.explain(),
            QueryPlan::Describe(plan) => plan.explain(),
        }
    }
}

/// The query clause shared by every body-carrying plan.
fn filter_query(filter: Option<&String>) -> Value {
    match filter {
        Some(condition) => json!({ "query_string": { "query": condition } }),
        None => json!({ "match_all": {} }),
    }
}

impl SearchPlan {
    fn explain(&self) -> BackendRequest {
        let mut body = Map::new();
        body.insert("query".to_string(), filter_query(self.filter.as_ref()));
        if !self.fields.is_empty() {
            body.insert("_source".to_string(), json!(self.fields));
        }
        if !self.sort.is_empty() {
            let sort: Vec<Value> = self
                .sort
                .iter()
                .map(|(field, order)| {
                    let mut element = Map::new();
                    element.insert(field.clone(), json!({ "order": order.as_str() }));
                    Value::Object(element)
                })
                .collect();
            body.insert("sort".to_string(), Value::Array(sort));
        }
        if let Some(limit) = self.limit {
            body.insert("size".to_string(), json!(limit));
        }
        BackendRequest {
            method: Method::Post,
            path: format!("/{}/_search", self.index),
            body: Some(Value::Object(body)),
        }
    }
}

impl AggregatePlan {
    fn explain(&self) -> BackendRequest {
        let metrics: Map<String, Value> = self
            .metrics
            .iter()
            .filter_map(|call| {
                let body = match call.function {
                    // COUNT(*) is read off the bucket doc_count
                    AggregateFunction::Count if call.field == "*" => None,
                    AggregateFunction::Count => {
                        Some(json!({ "value_count": { "field": call.field } }))
                    }
                    AggregateFunction::Sum => Some(json!({ "sum": { "field": call.field } })),
                    AggregateFunction::Avg => Some(json!({ "avg": { "field": call.field } })),
                    AggregateFunction::Min => Some(json!({ "min": { "field": call.field } })),
                    AggregateFunction::Max => Some(json!({ "max": { "field": call.field } })),
                };
                body.map(|body| (call.label(), body))
            })
            .collect();

        // nest one terms bucket per grouped column, innermost first
        let mut aggregations = Value::Object(metrics);
        for field in self.group_by.iter().rev() {
            let mut bucket = Map::new();
            bucket.insert("terms".to_string(), json!({ "field": field }));
            if let Value::Object(inner) = &aggregations {
                if !inner.is_empty() {
                    bucket.insert("aggregations".to_string(), aggregations.clone());
                }
            }
            let mut wrapper = Map::new();
            wrapper.insert(field.clone(), Value::Object(bucket));
            aggregations = Value::Object(wrapper);
        }

        let mut body = Map::new();
        body.insert("size".to_string(), json!(0));
        body.insert("query".to_string(), filter_query(self.filter.as_ref()));
        match &aggregations {
            // COUNT(*) alone needs nothing beyond the hit total
            Value::Object(inner) if inner.is_empty() => {}
            _ => {
                body.insert("aggregations".to_string(), aggregations);
            }
        }

        BackendRequest {
            method: Method::Post,
            path: format!("/{}/_search", self.index),
            body: Some(Value::Object(body)),
        }
    }
}

impl DeletePlan {
    fn explain(&self) -> BackendRequest {
        BackendRequest {
            method: Method::Post,
            path: format!("/{}/_delete_by_query", self.index),
            body: Some(json!({ "query": filter_query(self.filter.as_ref()) })),
        }
    }
}

impl ShowPlan {
    fn explain(&self) -> BackendRequest {
        BackendRequest {
            method: Method::Get,
            path: format!("/{}/_mapping", self.pattern),
            body: None,
        }
    }
}

impl DescribePlan {
    fn explain(&self) -> BackendRequest {
        BackendRequest {
            method: Method::Get,
            path: format!("/{}/_mapping", self.index),
            body: None,
        }
    }
}
