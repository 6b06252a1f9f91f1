//! Metrics collection and exposition.
//!
//! # Metrics
//! - `homp_dependency_up` (gauge): 1 = last probe succeeded, 0 = failed
//! - `homp_probe_duration_seconds` (histogram): probe latency
//! - `homp_probes_total` (counter): probes by dependency and outcome
//!
//! All metrics carry a `dependency` label (`db` or `redis`).

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one probe.
pub fn record_probe(dependency: &'static str, ok: bool, start: Instant) {
    let outcome = if ok { "ok" } else { "error" };

    ::metrics::gauge!("homp_dependency_up", "dependency" => dependency)
        .set(if ok { 1.0 } else { 0.0 });
    ::metrics::histogram!("homp_probe_duration_seconds", "dependency" => dependency)
        .record(start.elapsed().as_secs_f64());
    ::metrics::counter!("homp_probes_total", "dependency" => dependency, "outcome" => outcome)
        .increment(1);
}
