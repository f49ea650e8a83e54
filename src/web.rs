use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::{DashboardConfig, ServerConfig};

/// The full application: JSON API under `/api`, dashboard page everywhere else
pub fn app(state: AppState, server: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(&server.static_dir))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds.into(),
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: &DashboardConfig) -> Result<()> {
    let state = AppState::from_config(&config.provider)
        .context("Failed to set up weather provider client")?;
    let app = app(state, &config.server);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(
        "Web server running at http://localhost:{}",
        config.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server terminated unexpectedly")?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
