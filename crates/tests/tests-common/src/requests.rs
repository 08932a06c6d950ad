//! Builders for request payloads and canned backend responses.

use serde_json::{json, Value};

/// The JSON envelope of a prepared statement.
pub fn prepared_statement(query: &str, parameters: &[(&str, &str)], format: Option<&str>) -> String {
    let parameters: Vec<Value> = parameters
        .iter()
        .map(|(type_, value)| json!({ "type": type_, "value": value }))
        .collect();
    let mut envelope = json!({ "query": query, "parameters": parameters });
    if let Some(format) = format {
        envelope["format"] = json!(format);
    }
    envelope.to_string()
}

/// A two-hit search response over an accounts index.
pub fn accounts_search_response() -> Value {
    json!({
        "took": 4,
        "hits": {
            "total": { "value": 2 },
            "hits": [
                { "_id": "1", "_source": { "name": "alice", "age": 41, "state": "TN" } },
                { "_id": "2", "_source": { "name": "bob", "age": 36, "state": "UT" } }
            ]
        }
    })
}
