//! The SQL action endpoint for a document search cluster.
//!
//! A request carries a SQL statement, either as bare text or as a JSON
//! envelope with prepared-statement parameters, plus the name of an output
//! format. The endpoint normalizes the request, compiles the SQL into a
//! query plan, executes the plan against the cluster in the selected format
//! and reports exactly one outcome per request.

pub mod action;
pub mod health;
pub mod routes;
pub mod state;
pub mod wire;
