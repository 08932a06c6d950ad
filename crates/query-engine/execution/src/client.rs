//! The long-lived search backend client.

use serde_json::Value;

use query_engine_translation::{BackendRequest, Method};

use crate::error::BackendError;

/// A handle on the search cluster. Created once at startup and shared by
/// every request; this pipeline never mutates cluster state through it
/// outside of plan execution.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl SearchClient {
    pub fn new(base_url: url::Url) -> SearchClient {
        SearchClient {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Perform one backend round-trip and parse the response body as JSON.
    pub async fn execute(&self, request: &BackendRequest) -> Result<Value, BackendError> {
        let url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|_| BackendError::InvalidPath(request.path.clone()))?;

        tracing::debug!(%url, "backend request");

        let mut builder = match request.method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::ErrorResponse {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(BackendError::InvalidResponse)
    }

    /// Reachability check against the cluster root.
    pub async fn ping(&self) -> Result<(), BackendError> {
        self.execute(&BackendRequest {
            method: Method::Get,
            path: "/".to_string(),
            body: None,
        })
        .await
        .map(|_| ())
    }
}
