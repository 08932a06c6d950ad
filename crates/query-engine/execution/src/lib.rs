//! Query-plan execution against the search backend.
//!
//! The dispatcher selects a formatter by output-format name and runs the plan
//! against the backend; every formatter performs exactly one backend
//! round-trip and renders the complete response body.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod metrics;

pub use client::SearchClient;
pub use dispatch::Dispatcher;
pub use error::{BackendError, Error};
