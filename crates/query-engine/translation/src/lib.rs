//! Compilation of canonical SQL into an executable query plan.
//!
//! The compiler classifies a statement into one of a closed set of plan
//! variants and renders each variant's search-backend request. Downstream
//! stages treat the plan as opaque: they only read the original SQL back out
//! of it and hand its rendered request to the backend client.

pub mod compile;
pub mod error;
pub mod plan;

pub use compile::compile;
pub use error::Error;
pub use plan::{BackendRequest, Method, QueryPlan};
