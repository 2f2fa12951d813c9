use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use catalog_api_rust::api::ErrorCatalog;
use catalog_api_rust::database::{DatabaseManager, PgCatalogStore};
use catalog_api_rust::server::{app, AppState};
use catalog_api_rust::services::CatalogService;

#[derive(Parser)]
#[command(name = "catalog-api")]
#[command(about = "Catalog API - products, categories, departments, attributes and reviews")]
#[command(version)]
struct Args {
    #[arg(long, env = "CATALOG_API_HOST", default_value = "0.0.0.0", help = "Address to bind")]
    host: String,

    #[arg(long, env = "CATALOG_API_PORT", help = "Port to listen on (falls back to PORT, then 3000)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, RUST_LOG, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = catalog_api_rust::config::config();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.api.log_filter))
        .init();

    tracing::info!("Starting Catalog API in {:?} mode", config.environment);

    let args = Args::parse();
    let port = args
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(3000);

    let db = DatabaseManager::connect_lazy(&config.database).context("database configuration")?;
    let store = Arc::new(PgCatalogStore::new(db.clone()));
    let catalog = CatalogService::new(store, ErrorCatalog::default(), config);
    let app = app(AppState::new(catalog), config);

    let bind_addr = format!("{}:{}", args.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Catalog API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
