//! # Metrics Collection
//!
//! Provides Prometheus metrics for the documentation aggregator.

use std::net::SocketAddr;

use ::tracing::{info, warn};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};

/// Metrics recorder that tracks aggregation metrics
///
/// Calls are no-ops until a global recorder is installed by [`init_metrics`].
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    /// Create a new metrics recorder instance
    pub fn new() -> Self {
        Self
    }

    /// Record how a document lookup was satisfied (hit, coalesced, fetched)
    pub fn record_cache_lookup(&self, route_id: &str, outcome: &str) {
        let labels = [("route_id", route_id.to_string()), ("outcome", outcome.to_string())];
        counter!("swagger_cache_lookups_total", &labels).increment(1);
    }

    /// Record one upstream document request
    pub fn record_upstream_fetch(&self, cluster_id: &str, success: bool, duration: f64) {
        let status = if success { "success" } else { "error" };
        let labels = [("cluster_id", cluster_id.to_string()), ("status", status.to_string())];
        counter!("swagger_upstream_fetches_total", &labels).increment(1);

        let duration_labels = [("cluster_id", cluster_id.to_string())];
        histogram!("swagger_upstream_fetch_duration_seconds", &duration_labels).record(duration);
    }

    /// Record an aggregated document request and its outcome
    pub fn record_aggregation(&self, route_id: &str, outcome: &str, duration: f64) {
        let labels = [("route_id", route_id.to_string()), ("outcome", outcome.to_string())];
        counter!("swagger_aggregations_total", &labels).increment(1);

        let duration_labels = [("route_id", route_id.to_string())];
        histogram!("swagger_aggregation_duration_seconds", &duration_labels).record(duration);
    }

    /// Record entries dropped by the cache sweeper
    pub fn record_cache_purge(&self, removed: usize) {
        counter!("swagger_cache_purged_entries_total").increment(removed as u64);
    }

    /// Register metric descriptions
    pub fn register_metrics(&self) {
        describe_counter!(
            "swagger_cache_lookups_total",
            Unit::Count,
            "Document lookups by cache outcome"
        );
        describe_counter!(
            "swagger_upstream_fetches_total",
            Unit::Count,
            "Backend document requests by status"
        );
        describe_histogram!(
            "swagger_upstream_fetch_duration_seconds",
            Unit::Seconds,
            "Latency of backend document requests"
        );
        describe_counter!(
            "swagger_aggregations_total",
            Unit::Count,
            "Aggregated document requests by outcome"
        );
        describe_histogram!(
            "swagger_aggregation_duration_seconds",
            Unit::Seconds,
            "Latency of aggregated document requests"
        );
        describe_counter!(
            "swagger_cache_purged_entries_total",
            Unit::Count,
            "Expired cache entries removed by the sweeper"
        );
    }
}

/// Initialize metrics collection and Prometheus exporter
pub async fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    if !config.enable_metrics {
        return Ok(());
    }

    let metrics_addr = match config.metrics_bind_address() {
        Some(addr) => addr,
        None => {
            warn!("Metrics disabled: no bind address configured");
            return Ok(());
        }
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        Error::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    let builder = PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name);

    builder
        .install()
        .map_err(|e| Error::config(format!("Failed to initialize metrics exporter: {}", e)))?;

    MetricsRecorder::new().register_metrics();

    info!(
        metrics_addr = %metrics_addr,
        service_name = %config.service_name,
        "Metrics collection initialized"
    );

    Ok(())
}
