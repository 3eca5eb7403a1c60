//! # Configuration Settings
//!
//! Defines the configuration structure for the Swagger gateway.

use crate::config::proxy::ReverseProxyConfig;
use crate::domain::Route;
use crate::errors::{Error, Result};
use crate::services::backend_selector::LoadBalancingStrategy;
use crate::services::document_fetcher::base_url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use validator::Validate;

/// Paths owned by the gateway itself; the documentation UI may not shadow them.
const RESERVED_PATH_PREFIXES: &[&str] = &["/swagger-json", "/api-docs", "/health"];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Hosting environment
    pub environment: Environment,

    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Documentation aggregation settings
    #[validate(nested)]
    pub aggregator: AggregatorConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,

    /// Routes and clusters of the surrounding reverse proxy
    pub reverse_proxy: ReverseProxyConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()?;
        Ok(())
    }

    /// Whether the aggregated documentation endpoints and UI are mounted.
    ///
    /// Documentation is a development aid and stays hidden elsewhere unless
    /// explicitly enabled.
    pub fn docs_enabled(&self) -> bool {
        self.environment.is_development() || self.aggregator.enabled_in_all_environments
    }

    fn validate_custom(&self) -> Result<()> {
        let ui_path = self.aggregator.ui_path.as_str();
        if !ui_path.starts_with('/') || ui_path.len() < 2 || ui_path.ends_with('/') {
            return Err(Error::validation_field(
                "UI path must start with '/', not end with '/', and not be the root",
                "aggregator.ui_path",
            ));
        }
        if RESERVED_PATH_PREFIXES.iter().any(|reserved| ui_path.starts_with(reserved)) {
            return Err(Error::validation_field(
                format!("UI path '{}' collides with a gateway endpoint", ui_path),
                "aggregator.ui_path",
            ));
        }

        if self.observability.enable_metrics && self.observability.metrics_port == self.server.port
        {
            return Err(Error::validation("Server and metrics ports cannot be the same"));
        }

        for (route_id, route) in &self.reverse_proxy.routes {
            if !Route::is_valid_id(route_id) {
                return Err(Error::validation_field(
                    format!(
                        "Route id '{}' must contain only ASCII letters, digits, '-', '_' or '.'",
                        route_id
                    ),
                    "reverse_proxy.routes",
                ));
            }
            if route.cluster_id.trim().is_empty() {
                return Err(Error::validation_field(
                    format!("Route '{}' does not reference a cluster", route_id),
                    "reverse_proxy.routes.cluster_id",
                ));
            }
        }

        for (cluster_id, cluster) in &self.reverse_proxy.clusters {
            for (name, destination) in &cluster.destinations {
                base_url(&destination.address).map_err(|e| {
                    Error::validation_field(
                        format!("Destination '{}' of cluster '{}': {}", name, cluster_id, e),
                        "reverse_proxy.clusters.destinations.address",
                    )
                })?;
            }
        }

        Ok(())
    }
}

/// Hosting environment, mirroring the usual development/staging/production split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Documentation aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AggregatorConfig {
    /// How long a fetched backend document stays fresh
    #[validate(range(
        min = 1,
        max = 86400,
        message = "Cache TTL must be between 1 second and 24 hours"
    ))]
    pub cache_ttl_seconds: u64,

    /// Overall timeout of one backend document request
    #[validate(range(
        min = 1,
        max = 600,
        message = "Fetch timeout must be between 1 and 600 seconds"
    ))]
    pub fetch_timeout_seconds: u64,

    /// Connect timeout of one backend document request
    #[validate(range(
        min = 1,
        max = 120,
        message = "Connect timeout must be between 1 and 120 seconds"
    ))]
    pub connect_timeout_seconds: u64,

    /// Strategy used to pick a destination within a cluster
    pub load_balancing: LoadBalancingStrategy,

    /// Path the interactive documentation UI is served under
    #[validate(length(min = 2, message = "UI path cannot be empty"))]
    pub ui_path: String,

    /// Serve documentation outside the development environment
    pub enabled_in_all_environments: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 300, // 5 minutes
            fetch_timeout_seconds: 100,
            connect_timeout_seconds: 10,
            load_balancing: LoadBalancingStrategy::Random,
            ui_path: "/swagger".to_string(),
            enabled_in_all_environments: false,
        }
    }
}

impl AggregatorConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

/// Observability configuration for logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,

    /// Enable the Prometheus exporter
    pub enable_metrics: bool,

    /// Metrics server port (0 = disabled)
    pub metrics_port: u16,

    /// Service name attached to logs and metrics
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logging: false,
            enable_metrics: false,
            metrics_port: 9090,
            service_name: "swagger-gateway".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Get metrics bind address (None if disabled)
    pub fn metrics_bind_address(&self) -> Option<String> {
        if self.metrics_port == 0 {
            None
        } else {
            Some(format!("0.0.0.0:{}", self.metrics_port))
        }
    }
}
