use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use weather_dashboard::{DashboardConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let env_loaded = dotenvy::dotenv();
    let config = DashboardConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging)?;

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => debug!("no .env file found"),
    }
    if config.provider.api_key.is_none() {
        warn!("No provider API key configured; weather and location requests will fail");
    }

    web::run(&config).await
}
