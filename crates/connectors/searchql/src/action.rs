//! The action endpoint: one request in, exactly one outcome out.
//!
//! A request moves through normalization, compilation and dispatch in order.
//! The first failing stage ends the request with its classified error; a
//! stage that panics is caught at the task boundary and reported as an
//! internal failure. No stage retries, and nothing is shared between
//! requests except the backend handle.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info_span, Instrument};

use query_engine_execution as execution;
use query_engine_request as request;
use query_engine_translation as translation;

use crate::state::State;
use crate::wire::{SqlQueryRequest, SqlQueryResponse};

/// A failure from one of the pipeline stages.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Normalize(#[from] request::NormalizeError),
    #[error("{0}")]
    Compile(#[from] translation::Error),
    #[error("{0}")]
    Dispatch(#[from] execution::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Run one request to its terminal outcome.
pub async fn execute(
    state: Arc<State>,
    request: SqlQueryRequest,
) -> Result<SqlQueryResponse, ActionError> {
    let outcome = tokio::spawn(run(state.clone(), request)).await;
    let result = match outcome {
        Ok(result) => result,
        // a panicking stage must still produce exactly one failure
        Err(join_error) => Err(ActionError::Internal(join_error.to_string())),
    };

    match &result {
        Ok(_) => state.metrics.query_total.inc(),
        Err(err) => {
            tracing::error!("{}", err);
            state.metrics.failure_total.inc();
        }
    }
    result
}

async fn run(
    state: Arc<State>,
    request: SqlQueryRequest,
) -> Result<SqlQueryResponse, ActionError> {
    let envelope = async {
        let raw = request::RawRequest::from_payload(&request.sql)?;
        Ok::<_, ActionError>(request::normalize(raw)?)
    }
    .instrument(info_span!("Normalize request"))
    .await?;

    // the transport-level format, when given, wins over the envelope's
    let format = if request.format.is_empty() {
        envelope.format
    } else {
        request.format
    };

    let plan = async { translation::compile(&envelope.sql).map_err(ActionError::Compile) }
        .instrument(info_span!("Compile query"))
        .await?;

    let result = state
        .dispatcher
        .dispatch(&format, &plan, &state.client)
        .instrument(info_span!("Dispatch plan"))
        .await?;

    Ok(SqlQueryResponse { result })
}
