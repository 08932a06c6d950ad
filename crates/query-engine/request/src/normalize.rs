//! Normalization of raw request payloads into canonical envelopes.

use serde::Deserialize;

use crate::bind::{bind, Parameter};
use crate::error::NormalizeError;

/// The output format used when a request does not name one.
pub const DEFAULT_FORMAT: &str = "jdbc";

/// The canonical `(format, sql)` pair produced by normalization. The SQL is
/// ready for compilation; no placeholders remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub format: String,
    pub sql: String,
}

/// A raw request payload, before normalization. Exactly one shape is present
/// per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRequest {
    /// A bare SQL string, passed through as-is.
    BareSql(String),
    /// A structured envelope carrying a SQL template, prepared-statement
    /// parameters, and optionally the desired output format.
    Structured {
        query: String,
        parameters: Vec<Parameter>,
        format: Option<String>,
    },
}

#[derive(Deserialize)]
struct StructuredPayload {
    query: String,
    #[serde(default)]
    parameters: Vec<Parameter>,
    #[serde(default)]
    format: Option<String>,
}

impl RawRequest {
    /// Classify a request body. Payloads that open with `{` must parse as the
    /// structured envelope; anything else is treated as bare SQL text.
    pub fn from_payload(payload: &str) -> Result<RawRequest, NormalizeError> {
        let trimmed = payload.trim();
        if trimmed.starts_with('{') {
            let envelope: StructuredPayload = serde_json::from_str(trimmed)
                .map_err(|err| NormalizeError::MalformedEnvelope(err.to_string()))?;
            Ok(RawRequest::Structured {
                query: envelope.query,
                parameters: envelope.parameters,
                format: envelope.format,
            })
        } else if trimmed.is_empty() {
            Err(NormalizeError::MalformedEnvelope(
                "empty request body".to_string(),
            ))
        } else {
            Ok(RawRequest::BareSql(trimmed.to_string()))
        }
    }
}

/// Produce a canonical envelope from a raw request, binding parameters into
/// the template when any are present.
pub fn normalize(raw: RawRequest) -> Result<Envelope, NormalizeError> {
    match raw {
        RawRequest::BareSql(sql) => Ok(Envelope {
            format: DEFAULT_FORMAT.to_string(),
            sql,
        }),
        RawRequest::Structured {
            query,
            parameters,
            format,
        } => {
            let sql = if parameters.is_empty() {
                query
            } else {
                bind(&query, &parameters)?
            };
            let format = match format {
                Some(name) if !name.is_empty() => name,
                _ => DEFAULT_FORMAT.to_string(),
            };
            tracing::debug!(format, "normalized prepared statement");
            Ok(Envelope { format, sql })
        }
    }
}
