use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use broadcast_service::{api::run_api_server, clients::fcm::FcmClient, config::Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = Config::load()?;
    let fcm_client = FcmClient::new(&config).await?;

    run_api_server(config, Arc::new(fcm_client))
        .await
        .map_err(|e| anyhow!("Server error: {}", e))
}
