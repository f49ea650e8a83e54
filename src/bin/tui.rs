use anyhow::{Context, Result};
use weather_dashboard::{DashboardConfig, dashboard::terminal, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = DashboardConfig::load().context("Failed to load configuration")?;
    logging::init_stderr(&config.logging)?;

    terminal::run(&config.dashboard).await
}
