//! # Swagger Gateway
//!
//! Companion service for a reverse proxy that publishes one browsable API
//! documentation UI for every backend behind the proxy.
//!
//! ## Architecture
//!
//! ```text
//! HTTP endpoint → Swagger Aggregator → Document Cache → Document Fetcher → Backends
//!                        ↓                   ↓
//!                  Path Rewriter     Destination Selector
//! ```
//!
//! For each proxy route the gateway serves
//! `/swagger-json/{routeId}/swagger/{service}/swagger.json`: the backend's own
//! document with every path prefixed by the segment the proxy strips before
//! forwarding, so "try it out" requests from the UI go through the proxy.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use swagger_gateway::{config::AppConfig, startup, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None)?;
//!     startup::run(config).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod services;
pub mod startup;

// Re-export commonly used types and traits
pub use config::{AppConfig, Environment};
pub use errors::{Error, Result};
pub use services::SwaggerAggregator;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
