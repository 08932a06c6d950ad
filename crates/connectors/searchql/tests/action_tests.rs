use std::sync::Arc;

use serde_json::{json, Value};

use axum::http::StatusCode;
use query_engine_execution::error::BackendError;
use query_engine_execution::format::Formatter;
use query_engine_execution::{metrics, Dispatcher, Error as DispatchError, SearchClient};
use query_engine_request::NormalizeError;
use query_engine_translation::{Error as CompileError, QueryPlan};
use searchql::action::{self, ActionError};
use searchql::state::State;
use searchql::wire::SqlQueryRequest;
use tests_common::backend::StubBackend;
use tests_common::requests::{accounts_search_response, prepared_statement};

fn state_for(backend: &StubBackend) -> Arc<State> {
    let mut registry = prometheus::Registry::new();
    Arc::new(State {
        metrics: metrics::initialise_metrics(&mut registry).unwrap(),
        client: SearchClient::new(backend.base_url()),
        dispatcher: Dispatcher::new(),
    })
}

#[tokio::test]
async fn a_prepared_statement_runs_end_to_end() {
    let backend = StubBackend::spawn(accounts_search_response()).await;
    let state = state_for(&backend);

    let payload = prepared_statement(
        "SELECT * FROM accounts WHERE age > ? AND state IN (?, ?) LIMIT ?",
        &[
            ("integer", "35"),
            ("string", "TN"),
            ("string", "UT"),
            ("short", "20"),
        ],
        None,
    );
    let response = action::execute(state.clone(), SqlQueryRequest::new("", &payload))
        .await
        .unwrap();

    let rendered: Value = serde_json::from_str(&response.result).unwrap();
    assert_eq!(rendered["total"], json!(2));
    assert_eq!(rendered["datarows"][0], json!([41, "alice", "TN"]));

    assert_eq!(backend.request_count(), 1);
    assert_eq!(state.metrics.query_total.get(), 1);
    assert_eq!(state.metrics.failure_total.get(), 0);
}

#[tokio::test]
async fn a_malformed_envelope_fails_without_a_round_trip() {
    let backend = StubBackend::spawn(accounts_search_response()).await;
    let state = state_for(&backend);

    let result = action::execute(
        state.clone(),
        SqlQueryRequest::new("", r#"{ "parameters": [] }"#),
    )
    .await;

    assert!(matches!(
        result,
        Err(ActionError::Normalize(NormalizeError::MalformedEnvelope(_)))
    ));
    assert_eq!(backend.request_count(), 0);
    assert_eq!(state.metrics.failure_total.get(), 1);
}

#[tokio::test]
async fn a_parameter_count_mismatch_fails_without_a_round_trip() {
    let backend = StubBackend::spawn(accounts_search_response()).await;
    let state = state_for(&backend);

    let payload = prepared_statement(
        "SELECT * FROM accounts WHERE age > ?",
        &[("integer", "35"), ("integer", "40")],
        None,
    );
    let result = action::execute(state, SqlQueryRequest::new("", &payload)).await;

    assert!(matches!(
        result,
        Err(ActionError::Normalize(NormalizeError::Binding(_)))
    ));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn an_unknown_format_compiles_but_never_executes() {
    let backend = StubBackend::spawn(accounts_search_response()).await;
    let state = state_for(&backend);

    let payload = prepared_statement(
        "SELECT * FROM accounts",
        &[],
        Some("unsupported-format"),
    );
    let result = action::execute(state, SqlQueryRequest::new("", &payload)).await;

    match result {
        Err(ActionError::Dispatch(DispatchError::UnknownFormat(name))) => {
            assert_eq!(name, "unsupported-format");
        }
        other => panic!("expected UnknownFormat, got {other:?}"),
    }
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn the_transport_format_wins_over_the_envelope() {
    let backend = StubBackend::spawn(accounts_search_response()).await;
    let state = state_for(&backend);

    let payload = prepared_statement("SELECT * FROM accounts", &[], Some("csv"));
    let response = action::execute(state, SqlQueryRequest::new("raw", &payload))
        .await
        .unwrap();

    assert_eq!(response.result, "41|alice|TN\n36|bob|UT");
}

#[tokio::test]
async fn a_parse_failure_is_classified() {
    let backend = StubBackend::spawn(accounts_search_response()).await;
    let state = state_for(&backend);

    let result = action::execute(state, SqlQueryRequest::new("", "EXPLODE the index")).await;

    assert!(matches!(
        result,
        Err(ActionError::Compile(CompileError::ParseFailure(_)))
    ));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn an_unsupported_feature_is_classified() {
    let backend = StubBackend::spawn(accounts_search_response()).await;
    let state = state_for(&backend);

    let result = action::execute(
        state,
        SqlQueryRequest::new("", "SELECT * FROM a JOIN b ON a.x = b.x"),
    )
    .await;

    assert!(matches!(
        result,
        Err(ActionError::Compile(CompileError::UnsupportedFeature(_)))
    ));
}

#[tokio::test]
async fn a_backend_failure_surfaces_as_execution_failure() {
    let backend = StubBackend::spawn_with_status(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "shard failure" }),
    )
    .await;
    let state = state_for(&backend);

    let result = action::execute(
        state.clone(),
        SqlQueryRequest::new("", "SELECT * FROM accounts"),
    )
    .await;

    assert!(matches!(
        result,
        Err(ActionError::Dispatch(DispatchError::ExecutionFailure(_)))
    ));
    assert_eq!(backend.request_count(), 1);
    assert_eq!(state.metrics.failure_total.get(), 1);
}

struct PanickingFormatter;

#[async_trait::async_trait]
impl Formatter for PanickingFormatter {
    async fn execute(
        &self,
        _plan: &QueryPlan,
        _backend: &SearchClient,
    ) -> Result<String, BackendError> {
        panic!("formatter exploded")
    }
}

#[tokio::test]
async fn a_panicking_stage_still_reports_exactly_one_failure() {
    let backend = StubBackend::spawn(accounts_search_response()).await;

    let mut registry = prometheus::Registry::new();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register("boom", Box::new(PanickingFormatter));
    let state = Arc::new(State {
        metrics: metrics::initialise_metrics(&mut registry).unwrap(),
        client: SearchClient::new(backend.base_url()),
        dispatcher,
    });

    let result = action::execute(
        state.clone(),
        SqlQueryRequest::new("boom", "SELECT * FROM accounts"),
    )
    .await;

    assert!(matches!(result, Err(ActionError::Internal(_))));
    assert_eq!(state.metrics.failure_total.get(), 1);
    assert_eq!(state.metrics.query_total.get(), 0);
}
