use std::net::SocketAddr;

// ── Availability build metrics ──────────────────────────────────

/// Counter: availability builds started.
pub const BUILDS_TOTAL: &str = "bistro_availability_builds_total";

/// Counter: builds aborted on a failed record fetch.
pub const BUILD_FAILURES_TOTAL: &str = "bistro_availability_build_failures_total";

/// Counter: completed builds discarded because a newer build had started.
pub const BUILDS_DISCARDED_TOTAL: &str = "bistro_availability_builds_discarded_total";

/// Counter: records rejected at ingestion validation.
pub const RECORDS_REJECTED_TOTAL: &str = "bistro_records_rejected_total";

/// Histogram: record fetch latency in seconds. Labels: stream.
pub const FETCH_DURATION_SECONDS: &str = "bistro_record_fetch_duration_seconds";

// ── Submission metrics ──────────────────────────────────────────

/// Counter: reservations submitted (optimistically applied).
pub const RESERVATIONS_SUBMITTED_TOTAL: &str = "bistro_reservations_submitted_total";

/// Counter: reservation writes the transport reported as failed.
pub const RESERVATION_SUBMIT_FAILURES_TOTAL: &str = "bistro_reservation_submit_failures_total";

/// Counter: cart orders submitted.
pub const ORDERS_SUBMITTED_TOTAL: &str = "bistro_orders_submitted_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
