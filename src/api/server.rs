use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{config::ServerConfig, errors::Error};

pub async fn start_api_server(config: &ServerConfig, router: Router) -> crate::Result<()> {
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| Error::config(format!("Invalid server address: {}", e)))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::io(e, format!("Failed to bind HTTP server on {}", addr)))?;

    info!(address = %addr, "Starting HTTP server");
    run_http_server(listener, router).await?;

    info!("HTTP server shutdown completed");
    Ok(())
}

async fn run_http_server(listener: TcpListener, router: Router) -> crate::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "HTTP server shutdown listener failed");
            }
        })
        .await
        .map_err(|e| Error::io(e, "HTTP server error"))
}
