// src/main.rs
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use wrr_load_balancer::{
    config,
    load_balancer::create_load_balancer,
    proxy::Proxy,
    server::{RequestHandler, ServerBuilder},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wrr_load_balancer=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    if let Err(err) = run().await {
        error!("{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    let balancer = create_load_balancer(&config).context("Invalid backend configuration")?;
    for backend in &config.backends {
        info!("Backend {} (weight {})", backend.address, backend.weight);
    }

    let proxy = Arc::new(Proxy::new(balancer, config.backend_timeout())?);
    let handler = RequestHandler::new(proxy);

    info!("Starting load balancer on {}", config.listen);
    ServerBuilder::new(config.listen, handler)
        .serve()
        .await
        .context("Load balancer failed to start")?;

    Ok(())
}
