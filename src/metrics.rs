//! Prometheus metrics for request and registry monitoring.
//!
//! This module provides metrics for:
//! - HTTP request counts and latency
//! - Registry operation latency
//! - User lifecycle counters and the current user count

use std::time::Instant;

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::error::AppError;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Registry operation latency metric name.
pub const METRIC_REGISTRY_OP_LATENCY: &str = "registry_operation_latency_ms";
/// Users created counter metric name.
pub const METRIC_USERS_CREATED: &str = "users_created_total";
/// Users updated counter metric name.
pub const METRIC_USERS_UPDATED: &str = "users_updated_total";
/// Users deleted counter metric name.
pub const METRIC_USERS_DELETED: &str = "users_deleted_total";
/// Rejected registry writes counter metric name.
pub const METRIC_REGISTRY_REJECTIONS: &str = "registry_rejections_total";
/// Registered users gauge metric name.
pub const METRIC_USERS_REGISTERED: &str = "users_registered";

/// Install the Prometheus recorder and return a handle for rendering.
pub fn install_prometheus() -> Result<PrometheusHandle, AppError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Metrics(e.to_string()))?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_REGISTRY_OP_LATENCY,
        "User registry operation latency in milliseconds"
    );

    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests served");
    describe_counter!(METRIC_USERS_CREATED, "Total number of users created");
    describe_counter!(METRIC_USERS_UPDATED, "Total number of users updated");
    describe_counter!(METRIC_USERS_DELETED, "Total number of users deleted");
    describe_counter!(
        METRIC_REGISTRY_REJECTIONS,
        "Total number of registry writes rejected, by reason"
    );

    describe_gauge!(METRIC_USERS_REGISTERED, "Number of users currently registered");

    debug!("Metrics initialized");
}

/// Record one served HTTP request.
pub fn record_http_request(start: Instant, method: &str, route: &str, status: u16) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!(METRIC_HTTP_REQUESTS, &labels).increment(1);
    histogram!(METRIC_HTTP_REQUEST_LATENCY, &labels).record(latency_ms);
}

/// Increment users created counter.
pub fn inc_users_created() {
    counter!(METRIC_USERS_CREATED).increment(1);
}

/// Increment users updated counter.
pub fn inc_users_updated() {
    counter!(METRIC_USERS_UPDATED).increment(1);
}

/// Increment users deleted counter.
pub fn inc_users_deleted() {
    counter!(METRIC_USERS_DELETED).increment(1);
}

/// Increment rejected writes counter.
pub fn inc_registry_rejections(reason: &'static str) {
    counter!(METRIC_REGISTRY_REJECTIONS, "reason" => reason).increment(1);
}

/// Set the registered users gauge.
pub fn set_users_registered(count: usize) {
    gauge!(METRIC_USERS_REGISTERED).set(count as f64);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
    operation: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric and operation label.
    pub fn new(metric_name: &'static str, operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
            operation,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.elapsed_ms();
        histogram!(self.metric_name, "operation" => self.operation).record(latency_ms);
    }
}

/// Create a latency timer for a registry operation.
pub fn timer_registry_op(operation: &'static str) -> LatencyTimer {
    LatencyTimer::new(METRIC_REGISTRY_OP_LATENCY, operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = timer_registry_op("test");
        sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 9.0); // Allow some tolerance
    }

    #[test]
    fn recording_without_recorder_is_a_noop() {
        record_http_request(Instant::now(), "GET", "/api/users", 200);
        inc_registry_rejections("conflict");
        set_users_registered(3);
    }
}
