//! Dev Points API Server

use processor::PointsCatalog;
use std::sync::Arc;
use tracing::info;

mod app;
mod error;
mod extract;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dev_points=debug".parse()?)
                .add_directive("api=debug".parse()?)
                .add_directive("processor=debug".parse()?),
        )
        .init();

    info!("🎮 Starting Dev Points API");

    // Load configuration
    let config = common::Config::from_env();

    let catalog = match &config.points_config_path {
        Some(path) => PointsCatalog::load(path)?,
        None => {
            info!("POINTS_CONFIG_PATH not set, using built-in points catalog");
            PointsCatalog::builtin()
        }
    };

    let state = Arc::new(AppState::new(catalog));
    let app = app::router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("🚀 Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
