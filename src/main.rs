use std::net::SocketAddr;

use anyhow::Context;
use storefront_payments::{api, config, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    logging::init();

    // Load configuration
    let config = config::Config::from_env()?;

    // Log startup info
    tracing::info!("Starting storefront payments");
    tracing::info!("Environment: {}", config.server.environment);
    tracing::info!("PayPal API: {}", config.paypal.base_url);
    tracing::info!("Secrets directory: {}", config.secrets.dir.display());

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("HOST must be an IP address, got {}", config.server.host))?;
    let addr = SocketAddr::from((host, config.server.port));

    // Build router
    let state = api::AppState::from_config(config)?;
    let app = api::router(state);

    // Start server
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
