//! # Structured Logging
//!
//! Subscriber setup and span macros built on the tracing ecosystem.
//!
//! The level comes from `RUST_LOG` when set, otherwise from
//! `observability.log_level`. JSON output is meant for log aggregation;
//! the default pretty output is meant for local development.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::{Error, Result};

/// Install the global tracing subscriber.
///
/// Fails if the configured level is not a valid filter directive or a global
/// subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            Error::config(format!("Invalid log level '{}': {}", config.log_level, e))
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json_logging {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false).flatten_event(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).try_init()
    };

    result.map_err(|e| Error::internal(format!("Failed to initialize logging: {}", e)))
}

/// Create a tracing span for request tracking.
///
/// ```rust,ignore
/// let span = request_span!("GET", "/health");
/// ```
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4()
        )
    };
    ($method:expr, $path:expr, $($field:tt)*) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Create a tracing span for one backend document fetch
#[macro_export]
macro_rules! fetch_span {
    ($route_id:expr, $service:expr) => {
        tracing::debug_span!(
            "document_fetch",
            route_id = %$route_id,
            service = %$service,
            fetch_id = %uuid::Uuid::new_v4()
        )
    };
    ($route_id:expr, $service:expr, $($field:tt)*) => {
        tracing::debug_span!(
            "document_fetch",
            route_id = %$route_id,
            service = %$service,
            fetch_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        environment = %config.environment,
        server_address = %config.server.bind_address(),
        docs_enabled = config.docs_enabled(),
        ui_path = %config.aggregator.ui_path,
        cache_ttl_seconds = config.aggregator.cache_ttl_seconds,
        load_balancing = ?config.aggregator.load_balancing,
        routes = config.reverse_proxy.routes.len(),
        clusters = config.reverse_proxy.clusters.len(),
        metrics_enabled = %config.observability.enable_metrics,
        "Swagger gateway configuration"
    );
}
