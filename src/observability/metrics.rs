//! Metrics collection and exposition.
//!
//! # Metrics
//! - `highlight_requests_total` (counter): requests by formatter, status
//! - `highlight_request_duration_seconds` (histogram): latency by formatter
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Exporter is optional and off by default

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one highlight request.
pub fn record_request(formatter: &str, status: u16, start: Instant) {
    let labels = [
        ("formatter", formatter.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("highlight_requests_total", &labels).increment(1);
    metrics::histogram!("highlight_request_duration_seconds", "formatter" => formatter.to_string())
        .record(start.elapsed().as_secs_f64());
}
