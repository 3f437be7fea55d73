//! Prometheus metrics for the refresh pipeline.
//!
//! This module provides metrics for:
//! - Per-provider fetch latency and market counts
//! - Refresh cycle counts and duration
//! - Detected opportunity counts

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::market::Source;

// === Metric Name Constants ===

/// Provider fetch latency metric name.
pub const METRIC_PROVIDER_FETCH_LATENCY: &str = "provider_fetch_latency_ms";
/// Refresh cycle duration metric name.
pub const METRIC_CYCLE_DURATION: &str = "refresh_cycle_duration_ms";
/// Markets fetched counter metric name.
pub const METRIC_MARKETS_FETCHED: &str = "markets_fetched_total";
/// Refresh cycles counter metric name.
pub const METRIC_CYCLES_COMPLETED: &str = "refresh_cycles_total";
/// Opportunities detected counter metric name.
pub const METRIC_OPPORTUNITIES_DETECTED: &str = "opportunities_detected_total";

/// Install the Prometheus recorder and return its render handle.
///
/// Must be called at most once per process; the handle backs the
/// `/metrics` endpoint.
pub fn install_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_PROVIDER_FETCH_LATENCY,
        "Provider fetch latency in milliseconds"
    );
    describe_histogram!(
        METRIC_CYCLE_DURATION,
        "Full refresh cycle duration in milliseconds"
    );

    describe_counter!(
        METRIC_MARKETS_FETCHED,
        "Total number of normalized markets fetched, by provider"
    );
    describe_counter!(METRIC_CYCLES_COMPLETED, "Total number of refresh cycles run");
    describe_counter!(
        METRIC_OPPORTUNITIES_DETECTED,
        "Total number of arbitrage opportunities detected"
    );

    debug!("Metrics initialized");
}

/// Record one provider fetch's latency.
pub fn record_provider_fetch_latency(start: Instant, source: Source) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_PROVIDER_FETCH_LATENCY, "source" => source.to_string()).record(latency_ms);
}

/// Record a full refresh cycle's duration.
pub fn record_cycle_duration(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_CYCLE_DURATION).record(latency_ms);
}

/// Count markets fetched from a provider.
pub fn inc_markets_fetched(source: Source, count: usize) {
    counter!(METRIC_MARKETS_FETCHED, "source" => source.to_string()).increment(count as u64);
}

/// Count a completed refresh cycle.
pub fn inc_cycles_completed() {
    counter!(METRIC_CYCLES_COMPLETED).increment(1);
}

/// Count opportunities detected in a cycle.
pub fn inc_opportunities_detected(count: usize) {
    counter!(METRIC_OPPORTUNITIES_DETECTED).increment(count as u64);
}
