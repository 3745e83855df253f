//! Metrics collection and Prometheus export.
//!
//! Installs the global recorder behind the `metrics` macros and renders
//! the /metrics endpoint.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder.
///
/// Call once at startup before any metrics are recorded; later calls are no-ops.
pub fn init_metrics() -> Result<(), BuildError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Count one dispatched operation by outcome (`success`, `invalid`, `error`).
pub fn record_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "bfhl_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}
