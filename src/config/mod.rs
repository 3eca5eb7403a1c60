//! # Configuration Management
//!
//! Layered configuration for the Swagger gateway: an optional file (YAML, TOML
//! or JSON, picked by extension) overridden by `SWAGGER_GATEWAY__*` environment
//! variables, e.g. `SWAGGER_GATEWAY__SERVER__PORT=5000`.

pub mod proxy;
pub mod settings;

use std::path::Path;

use ::config::{Config, Environment as EnvSource, File, FileFormat};

use crate::errors::Result;

pub use proxy::{
    ClusterConfig, DestinationConfig, ReverseProxyConfig, RouteConfig, RouteMatchConfig,
};
pub use settings::{
    AggregatorConfig, AppConfig, Environment, ObservabilityConfig, ServerConfig,
};

/// Environment variable naming the configuration file when `--config` is absent
pub const CONFIG_PATH_ENV: &str = "SWAGGER_GATEWAY_CONFIG";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "SWAGGER_GATEWAY";

impl AppConfig {
    /// Load and validate configuration from an optional file plus environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config: AppConfig = builder.add_source(env_source()).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from an in-memory document.
    pub fn parse_str(contents: &str, format: FileFormat) -> Result<Self> {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(contents, format))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

fn env_source() -> EnvSource {
    EnvSource::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__").try_parsing(true)
}
