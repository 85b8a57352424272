//! Metrics collection and exposition.
//!
//! # Metrics
//! - `contact_requests_total` (counter): requests by method and status
//! - `contact_rate_limited_total` (counter): rejected by the rate limiter
//! - `contact_submissions_total` (counter): submissions persisted
//!
//! # Design Decisions
//! - Counters only; the pipeline has no interesting latency distribution
//!   beyond what the access log already shows
//! - Exporter is optional and bound to its own address

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16) {
    metrics::counter!(
        "contact_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_rate_limited() {
    metrics::counter!("contact_rate_limited_total").increment(1);
}

pub fn record_submission() {
    metrics::counter!("contact_submissions_total").increment(1);
}
