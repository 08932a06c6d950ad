//! HTTP surface of the SQL action endpoint.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Serialize;

use query_engine_execution as execution;
use query_engine_translation as translation;

use crate::action::{self, ActionError};
use crate::health;
use crate::state::State;
use crate::wire::{SqlQueryRequest, WireError};

pub fn create_router(state: Arc<State>, metrics_registry: prometheus::Registry) -> Router {
    Router::new()
        .route("/_sql", post(post_sql))
        .route("/_sql/action", post(post_sql_action))
        .route("/health", get(get_health))
        .route("/metrics", get(get_metrics))
        .layer(Extension(state))
        .layer(Extension(metrics_registry))
}

/// The REST shape: the body is the raw payload (bare SQL or the JSON
/// envelope), the output format may be given as a query parameter.
async fn post_sql(
    Extension(state): Extension<Arc<State>>,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> Result<String, ServerError> {
    let format = params.get("format").cloned().unwrap_or_default();
    let request = SqlQueryRequest { format, sql: body };
    let response = action::execute(state, request).await?;
    Ok(response.result)
}

/// The transport shape: a binary request envelope in, a binary response
/// envelope out. Malformed encodings fail before normalization.
async fn post_sql_action(
    Extension(state): Extension<Arc<State>>,
    body: axum::body::Bytes,
) -> Result<Vec<u8>, ServerError> {
    let request = SqlQueryRequest::decode(&body).map_err(ServerError::Wire)?;
    let response = action::execute(state, request).await?;
    Ok(response.encode().to_vec())
}

async fn get_health(
    Extension(state): Extension<Arc<State>>,
) -> Result<&'static str, ServerError> {
    health::health_check(&state.client)
        .await
        .map_err(|err| ServerError::BackendUnavailable(err.to_string()))?;
    Ok("ok")
}

async fn get_metrics(
    Extension(metrics_registry): Extension<prometheus::Registry>,
) -> Result<String, ServerError> {
    let encoder = prometheus::TextEncoder::new();
    encoder
        .encode_to_string(&metrics_registry.gather())
        .map_err(|err| ServerError::Internal(err.to_string()))
}

pub enum ServerError {
    Action(ActionError),
    Wire(WireError),
    BackendUnavailable(String),
    Internal(String),
}

impl From<ActionError> for ServerError {
    fn from(value: ActionError) -> Self {
        ServerError::Action(value)
    }
}

#[derive(Serialize)]
struct JsonErrorResponse {
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::Action(err) => (action_status(&err), err.to_string()),
            ServerError::Wire(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ServerError::BackendUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ServerError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        tracing::error!("Returning error: {message} with status code: {status}");
        (status, Json(JsonErrorResponse { message })).into_response()
    }
}

fn action_status(error: &ActionError) -> StatusCode {
    match error {
        ActionError::Normalize(_) => StatusCode::BAD_REQUEST,
        ActionError::Compile(translation::Error::ParseFailure(_)) => StatusCode::BAD_REQUEST,
        ActionError::Compile(translation::Error::UnsupportedFeature(_)) => {
            StatusCode::NOT_IMPLEMENTED
        }
        ActionError::Dispatch(execution::Error::UnknownFormat(_)) => StatusCode::BAD_REQUEST,
        ActionError::Dispatch(execution::Error::ExecutionFailure(_)) => StatusCode::BAD_GATEWAY,
        ActionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
