//! Main entry point for the ExoLab Agents service

use exolab_agents::{
    api,
    chat::PgChatStore,
    config::Settings,
    retrieval::{PgVectorStore, VectorStore},
    AppState, Providers,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }

    info!("Starting ExoLab Agents");
    info!(
        "Loaded configuration: server={}:{}",
        settings.server.host, settings.server.port
    );

    // Database pool; connections are opened on first use
    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect_lazy(&settings.database.connection_url())?;

    let chat_store = Arc::new(PgChatStore::new(pool.clone()));
    let vector_store = Arc::new(PgVectorStore::new(pool));

    if let Err(e) = chat_store.ensure_schema().await {
        warn!(error = %e, "Failed to prepare chat history table");
    }
    if let Err(e) = vector_store.ensure_schema().await {
        warn!(error = %e, "Failed to prepare biolinks table");
    }

    let providers = Providers::from_settings(&settings)?;
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let app_state = Arc::new(AppState::new(settings, providers, chat_store, vector_store));

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
