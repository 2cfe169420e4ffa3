use std::net::SocketAddr;
use std::time::Instant;

use crate::engine::EngineError;

// ── Request metrics ──────────────────────────────────────────────

/// Counter: booking attempts. Labels: status.
pub const BOOKINGS_TOTAL: &str = "tablebook_bookings_total";

/// Counter: cancellation attempts. Labels: status.
pub const CANCELLATIONS_TOTAL: &str = "tablebook_cancellations_total";

/// Counter: availability queries. Labels: status.
pub const AVAILABILITY_QUERIES_TOTAL: &str = "tablebook_availability_queries_total";

/// Histogram: engine operation latency in seconds. Labels: operation.
pub const OPERATION_DURATION_SECONDS: &str = "tablebook_operation_duration_seconds";

// ── State metrics ────────────────────────────────────────────────

/// Gauge: reservations currently held.
pub const RESERVATIONS_ACTIVE: &str = "tablebook_reservations_active";

/// Gauge: size of the table inventory.
pub const TABLES: &str = "tablebook_tables";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Count one attempt under `status` ("ok" or the error label) and record
/// its latency.
pub fn record_outcome(
    counter: &'static str,
    operation: &'static str,
    started: Instant,
    err: Option<&EngineError>,
) {
    let status = err.map_or("ok", EngineError::label);
    metrics::counter!(counter, "status" => status).increment(1);
    metrics::histogram!(OPERATION_DURATION_SECONDS, "operation" => operation)
        .record(started.elapsed().as_secs_f64());
}
