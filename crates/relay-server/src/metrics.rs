//! Metrics collection and export.
//!
//! Uses the `metrics` crate for instrumentation and exports to Prometheus
//! format. Recording helpers are no-ops until a recorder is installed, so
//! library callers and tests can use them freely.

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// Metric names.
pub mod names {
    pub const CONNECTIONS_TOTAL: &str = "relay_connections_total";
    pub const CONNECTIONS_ACTIVE: &str = "relay_connections_active";
    pub const CONNECTIONS_REFUSED: &str = "relay_connections_refused_total";
    pub const MESSAGES_TOTAL: &str = "relay_messages_total";
    pub const MESSAGES_BYTES: &str = "relay_messages_bytes";
    pub const LOG_WRITE_FAILURES: &str = "relay_log_write_failures_total";
}

/// Initialize the metrics system.
pub fn init_metrics() {
    metrics::describe_counter!(
        names::CONNECTIONS_TOTAL,
        "Total number of connections since server start"
    );
    metrics::describe_gauge!(
        names::CONNECTIONS_ACTIVE,
        "Current number of registered participants"
    );
    metrics::describe_counter!(
        names::CONNECTIONS_REFUSED,
        "Connections refused because the registry was full"
    );
    metrics::describe_counter!(names::MESSAGES_TOTAL, "Total number of messages relayed");
    metrics::describe_counter!(names::MESSAGES_BYTES, "Total bytes of messages relayed");
    metrics::describe_counter!(
        names::LOG_WRITE_FAILURES,
        "Chat log appends that failed and were dropped"
    );

    info!("Metrics initialized");
}

/// Start the Prometheus metrics server.
///
/// # Errors
///
/// Returns an error if the exporter cannot be started.
pub fn start_metrics_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    info!("Metrics server listening on {}", addr);
    Ok(())
}

/// Record a registered connection.
pub fn record_connection() {
    counter!(names::CONNECTIONS_TOTAL).increment(1);
    gauge!(names::CONNECTIONS_ACTIVE).increment(1.0);
}

/// Record an unregistered connection.
pub fn record_disconnection() {
    gauge!(names::CONNECTIONS_ACTIVE).decrement(1.0);
}

/// Record a connection refused at capacity.
pub fn record_refusal() {
    counter!(names::CONNECTIONS_REFUSED).increment(1);
}

/// Record one relayed message of the given payload size.
pub fn record_message(bytes: usize) {
    counter!(names::MESSAGES_TOTAL).increment(1);
    counter!(names::MESSAGES_BYTES).increment(bytes as u64);
}

/// Record a dropped chat log append.
pub fn record_log_write_failure() {
    counter!(names::LOG_WRITE_FAILURES).increment(1);
}
