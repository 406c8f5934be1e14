// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::ChartService;
use crate::application::dataset_service::DatasetService;
use crate::infrastructure::config::{load_charts_config, load_server_config};
use crate::infrastructure::file_repository::FileSeriesRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_chart, health_check, list_charts, list_datasets, list_series, list_sets,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, RUST_LOG selects levels
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let server_config = load_server_config()?;
    let charts_config = load_charts_config()?;
    let theme = charts_config.theme.to_theme()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(FileSeriesRepository::load(&server_config.datasets)?);

    // Create services (application layer)
    let chart_service = ChartService::new(repository.clone(), charts_config, theme);
    let dataset_service = DatasetService::new(repository);

    // Create application state
    let state = Arc::new(AppState {
        chart_service,
        dataset_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/charts", get(list_charts))
        .route("/charts/:id", get(get_chart))
        .route("/datasets", get(list_datasets))
        .route("/datasets/:name/sets", get(list_sets))
        .route("/datasets/:name/sets/:set/series", get(list_series))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!(
        "{}:{}",
        server_config.server.host, server_config.server.port
    )
    .parse()?;
    tracing::info!("Starting metric-charts service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
