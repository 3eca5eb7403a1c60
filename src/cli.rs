//! # Command Line Interface

use std::path::PathBuf;

use clap::Parser;

use crate::config::CONFIG_PATH_ENV;

#[derive(Debug, Parser)]
#[command(name = "swagger-gateway")]
#[command(about = "Aggregated Swagger documentation for services behind a reverse proxy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path (YAML, TOML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Validate the configuration and exit without serving
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// Configuration file from `--config`, falling back to `SWAGGER_GATEWAY_CONFIG`
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["swagger-gateway", "--config", "gateway.yaml", "--check"]);
        assert_eq!(cli.config, Some(PathBuf::from("gateway.yaml")));
        assert!(cli.check);
        assert_eq!(cli.config_path(), Some(PathBuf::from("gateway.yaml")));
    }

    #[test]
    fn flags_are_optional() {
        let cli = Cli::parse_from(["swagger-gateway"]);
        assert!(cli.config.is_none());
        assert!(!cli.check);
    }
}
