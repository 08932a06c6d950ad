use serde_json::{json, Value};

use query_engine_execution::format::rows::{from_response, ResultSet};
use query_engine_execution::format::{csv, jdbc, raw};
use query_engine_translation::compile;

fn search_response() -> Value {
    json!({
        "took": 3,
        "hits": {
            "total": { "value": 2 },
            "hits": [
                { "_id": "1", "_source": { "name": "alice", "age": 41, "active": true } },
                { "_id": "2", "_source": { "name": "bob", "age": 36, "active": false } }
            ]
        }
    })
}

#[test]
fn it_flattens_search_hits() {
    let plan = compile("SELECT name, age FROM accounts").unwrap();
    let result = from_response(&plan, &search_response()).unwrap();
    assert_eq!(result.columns, vec!["name", "age"]);
    assert_eq!(
        result.rows,
        vec![
            vec![json!("alice"), json!(41)],
            vec![json!("bob"), json!(36)],
        ]
    );
}

#[test]
fn it_takes_columns_in_first_seen_order_for_star_selects() {
    let plan = compile("SELECT * FROM accounts").unwrap();
    let result = from_response(&plan, &search_response()).unwrap();
    assert_eq!(result.columns, vec!["active", "age", "name"]);
}

#[test]
fn missing_fields_become_nulls() {
    let plan = compile("SELECT name, missing FROM accounts").unwrap();
    let result = from_response(&plan, &search_response()).unwrap();
    assert_eq!(result.rows[0], vec![json!("alice"), Value::Null]);
}

#[test]
fn it_flattens_grouped_aggregations() {
    let plan = compile("SELECT state, COUNT(*), AVG(age) FROM accounts GROUP BY state").unwrap();
    let response = json!({
        "hits": { "total": { "value": 7 } },
        "aggregations": {
            "state": {
                "buckets": [
                    { "key": "TN", "doc_count": 4, "AVG(age)": { "value": 38.5 } },
                    { "key": "UT", "doc_count": 3, "AVG(age)": { "value": 29.0 } }
                ]
            }
        }
    });
    let result = from_response(&plan, &response).unwrap();
    assert_eq!(result.columns, vec!["state", "COUNT(*)", "AVG(age)"]);
    assert_eq!(
        result.rows,
        vec![
            vec![json!("TN"), json!(4), json!(38.5)],
            vec![json!("UT"), json!(3), json!(29.0)],
        ]
    );
}

#[test]
fn a_bare_count_reads_the_hit_total() {
    let plan = compile("SELECT COUNT(*) FROM accounts").unwrap();
    let response = json!({ "hits": { "total": { "value": 7 } } });
    let result = from_response(&plan, &response).unwrap();
    assert_eq!(result.rows, vec![vec![json!(7)]]);

    // older backends report a bare number
    let legacy = json!({ "hits": { "total": 7 } });
    let result = from_response(&plan, &legacy).unwrap();
    assert_eq!(result.rows, vec![vec![json!(7)]]);
}

#[test]
fn it_reads_the_delete_count() {
    let plan = compile("DELETE FROM accounts WHERE age > 90").unwrap();
    let response = json!({ "took": 12, "deleted": 5 });
    let result = from_response(&plan, &response).unwrap();
    assert_eq!(result.columns, vec!["deleted"]);
    assert_eq!(result.rows, vec![vec![json!(5)]]);
}

#[test]
fn it_lists_indices_for_show() {
    let plan = compile("SHOW TABLES").unwrap();
    let response = json!({
        "accounts": { "mappings": {} },
        "orders": { "mappings": {} }
    });
    let result = from_response(&plan, &response).unwrap();
    assert_eq!(result.columns, vec!["table"]);
    assert_eq!(
        result.rows,
        vec![vec![json!("accounts")], vec![json!("orders")]]
    );
}

#[test]
fn it_lists_columns_for_describe() {
    let plan = compile("DESCRIBE accounts").unwrap();
    let response = json!({
        "accounts": {
            "mappings": {
                "properties": {
                    "age": { "type": "long" },
                    "name": { "type": "text" }
                }
            }
        }
    });
    let result = from_response(&plan, &response).unwrap();
    assert_eq!(result.columns, vec!["table", "column", "type"]);
    assert_eq!(
        result.rows,
        vec![
            vec![json!("accounts"), json!("age"), json!("long")],
            vec![json!("accounts"), json!("name"), json!("text")],
        ]
    );
}

#[test]
fn it_rejects_unexpected_shapes() {
    let plan = compile("SELECT * FROM accounts").unwrap();
    let result = from_response(&plan, &json!({ "took": 1 }));
    assert!(result.is_err());
}

#[test]
fn jdbc_rendering_carries_schema_and_datarows() {
    let result = ResultSet {
        columns: vec!["name".to_string(), "age".to_string()],
        rows: vec![
            vec![json!("alice"), json!(41)],
            vec![json!("bob"), json!(36)],
        ],
    };
    assert_eq!(
        jdbc::render(&result),
        json!({
            "schema": [
                { "name": "name", "type": "text" },
                { "name": "age", "type": "long" }
            ],
            "datarows": [["alice", 41], ["bob", 36]],
            "total": 2,
            "size": 2,
            "status": 200,
        })
    );
}

#[test]
fn jdbc_types_fall_back_past_leading_nulls() {
    let result = ResultSet {
        columns: vec!["score".to_string()],
        rows: vec![vec![Value::Null], vec![json!(1.5)]],
    };
    let rendered = jdbc::render(&result);
    assert_eq!(rendered["schema"][0]["type"], json!("double"));
}

#[test]
fn csv_rendering_escapes_awkward_cells() {
    let result = ResultSet {
        columns: vec!["name".to_string(), "note".to_string()],
        rows: vec![vec![json!("a,b"), json!("say \"hi\"")]],
    };
    assert_eq!(csv::render(&result), "name,note\n\"a,b\",\"say \"\"hi\"\"\"");
}

#[test]
fn raw_rendering_is_pipe_delimited_without_a_header() {
    let result = ResultSet {
        columns: vec!["name".to_string(), "age".to_string()],
        rows: vec![
            vec![json!("alice"), json!(41)],
            vec![json!("bob"), Value::Null],
        ],
    };
    assert_eq!(raw::render(&result), "alice|41\nbob|");
}
