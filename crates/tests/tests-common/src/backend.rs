//! A stub search backend serving one canned response.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::any;
use axum::{Json, Router};
use serde_json::Value;

/// A running stub backend. It answers every request with the canned response
/// and counts how many requests it saw.
pub struct StubBackend {
    address: SocketAddr,
    requests: Arc<AtomicUsize>,
}

#[derive(Clone)]
struct StubState {
    response: Arc<Value>,
    status: StatusCode,
    requests: Arc<AtomicUsize>,
}

impl StubBackend {
    /// Spawn a stub that answers 200 with the given body.
    pub async fn spawn(response: Value) -> StubBackend {
        Self::spawn_with_status(StatusCode::OK, response).await
    }

    /// Spawn a stub that answers with the given status and body.
    pub async fn spawn_with_status(status: StatusCode, response: Value) -> StubBackend {
        let requests = Arc::new(AtomicUsize::new(0));
        let state = StubState {
            response: Arc::new(response),
            status,
            requests: requests.clone(),
        };
        let router = Router::new()
            .route("/", any(serve))
            .route("/*path", any(serve))
            .layer(Extension(state));

        let server = axum::Server::bind(&"127.0.0.1:0".parse().unwrap())
            .serve(router.into_make_service());
        let address = server.local_addr();
        tokio::spawn(server);

        StubBackend { address, requests }
    }

    pub fn base_url(&self) -> url::Url {
        url::Url::parse(&format!("http://{}/", self.address)).unwrap()
    }

    /// How many backend round-trips have been made.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

async fn serve(Extension(state): Extension<StubState>) -> impl IntoResponse {
    state.requests.fetch_add(1, Ordering::SeqCst);
    (state.status, Json(state.response.as_ref().clone()))
}
