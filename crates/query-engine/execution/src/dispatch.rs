//! Selection of an output formatter by format name.

use std::collections::BTreeMap;

use query_engine_translation::QueryPlan;

use crate::client::SearchClient;
use crate::error::Error;
use crate::format::{csv, jdbc, json, raw, Formatter};

/// A registry of recognized output formats. Lookup is a case-sensitive exact
/// match; unrecognized names never fall back to a default.
pub struct Dispatcher {
    formatters: BTreeMap<String, Box<dyn Formatter>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Dispatcher {
        let mut dispatcher = Dispatcher {
            formatters: BTreeMap::new(),
        };
        dispatcher.register("jdbc", Box::new(jdbc::JdbcFormatter));
        dispatcher.register("json", Box::new(json::JsonFormatter));
        dispatcher.register("csv", Box::new(csv::CsvFormatter));
        dispatcher.register("raw", Box::new(raw::RawFormatter));
        dispatcher
    }

    /// Register a formatter under a name. Names are matched exactly.
    pub fn register(&mut self, name: &str, formatter: Box<dyn Formatter>) {
        self.formatters.insert(name.to_string(), formatter);
    }

    pub fn recognized_formats(&self) -> Vec<&str> {
        self.formatters.keys().map(String::as_str).collect()
    }

    /// Run the plan through the formatter registered under `format`. The
    /// formatter performs the single backend round-trip for this request and
    /// returns the complete response body.
    pub async fn dispatch(
        &self,
        format: &str,
        plan: &QueryPlan,
        backend: &SearchClient,
    ) -> Result<String, Error> {
        let formatter = self
            .formatters
            .get(format)
            .ok_or_else(|| Error::UnknownFormat(format.to_string()))?;

        tracing::debug!(format, plan = plan.kind(), "dispatching plan");

        formatter
            .execute(plan, backend)
            .await
            .map_err(Error::ExecutionFailure)
    }
}
