//! Request normalization for the SQL action endpoint.
//!
//! An incoming request body is either a bare SQL string or a structured JSON
//! envelope carrying a SQL template plus typed prepared-statement parameters.
//! This crate turns both shapes into a canonical `(format, sql)` pair, binding
//! parameters into placeholders along the way.

pub mod bind;
pub mod error;
pub mod normalize;

pub use bind::bind;
pub use error::{BindError, NormalizeError};
pub use normalize::{normalize, Envelope, RawRequest, DEFAULT_FORMAT};
pub use bind::{Parameter, ParameterType};
