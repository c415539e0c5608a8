//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (requests, latency, preflights)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status, pattern
//! - `router_request_duration_seconds` (histogram): dispatch latency by pattern
//! - `router_preflight_total` (counter): answered preflights by pattern
//!
//! # Design Decisions
//! - Labels use the canonical pattern, never the raw path (bounded cardinality)
//! - Without an installed recorder the `metrics` macros do nothing

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Starts the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Records one dispatched request.
pub fn record_request(method: &str, status: u16, pattern: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("pattern", pattern.to_string()),
    ];
    metrics::counter!("router_requests_total", &labels).increment(1);
    metrics::histogram!("router_request_duration_seconds", "pattern" => pattern.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Records one answered preflight.
pub fn record_preflight(pattern: &str) {
    metrics::counter!("router_preflight_total", "pattern" => pattern.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_request("GET", 200, "/items/{v}", Instant::now());
        record_preflight("/items/{v}");
    }
}
