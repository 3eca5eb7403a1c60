use clap::Parser;
use swagger_gateway::{
    cli::Cli, config::AppConfig, observability::init_observability,
    observability::log_config_info, startup, Result, APP_NAME, VERSION,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (optional - won't fail if missing)
    // This must happen before any config is read from environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let cli = Cli::parse();
    let config_path = cli.config_path();
    let config = AppConfig::load(config_path.as_deref())?;

    init_observability(&config.observability).await?;
    info!(app_name = APP_NAME, version = VERSION, "Starting Swagger gateway");
    log_config_info(&config);

    if cli.check {
        info!(config = ?config_path, "Configuration is valid");
        return Ok(());
    }

    if let Err(e) = startup::run(config).await {
        error!(error = %e, "Swagger gateway terminated with an error");
        return Err(e);
    }

    info!("Swagger gateway stopped");
    Ok(())
}
