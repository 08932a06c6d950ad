//! Metrics setup and update for the SQL endpoint.

use prometheus::core::{AtomicU64, GenericCounter};

#[derive(Debug, Clone)]
pub struct Metrics {
    pub query_total: GenericCounter<AtomicU64>,
    pub failure_total: GenericCounter<AtomicU64>,
}

/// Create a new int counter metric and register it with the provided
/// Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericCounter<AtomicU64>, prometheus::Error> {
    let int_counter =
        prometheus::IntCounter::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(int_counter.clone()))?;
    Ok(int_counter)
}

/// Setup counters used to produce Prometheus metrics
pub fn initialise_metrics(
    metrics_registry: &mut prometheus::Registry,
) -> Result<Metrics, prometheus::Error> {
    let query_total = add_int_counter_metric(
        metrics_registry,
        "searchql_query_total",
        "Total successful queries.",
    )?;

    let failure_total = add_int_counter_metric(
        metrics_registry,
        "searchql_failure_total",
        "Total failed queries.",
    )?;

    Ok(Metrics {
        query_total,
        failure_total,
    })
}
