//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, upstream
//! - `proxy_request_duration_seconds` (histogram): latency by method, upstream
//!
//! # Design Decisions
//! - Recording is always on; without an installed recorder the macros are
//!   no-ops
//! - The Prometheus endpoint is opt-in (`observability.metrics_enabled`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, upstream: &str, start_time: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("upstream", upstream.to_string()),
    ];
    counter!("proxy_requests_total", &labels).increment(1);

    let labels = [
        ("method", method.to_string()),
        ("upstream", upstream.to_string()),
    ];
    histogram!("proxy_request_duration_seconds", &labels)
        .record(start_time.elapsed().as_secs_f64());
}
