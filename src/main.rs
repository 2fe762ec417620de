mod agent;
mod api;
mod config;
mod error;
mod rag;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use agent::HttpAgentInvoker;
use config::Settings;
use rag::shots::ShotStore;
use rag::QueryService;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load env before the filter so RUST_LOG from .env takes effect
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();
    info!(
        model = %settings.model_name,
        database = %settings.database_path.display(),
        "settings loaded"
    );

    let store = Arc::new(ShotStore::load(&settings.shots_path)?);
    info!(shots = store.len(), "validated-query store ready");

    let agent = Arc::new(HttpAgentInvoker::new(&settings)?);
    let service = Arc::new(QueryService::new(agent, store, &settings));

    // Surface a degraded configuration at startup instead of on the first query
    let health = service.health();
    if health.is_healthy() {
        info!("service healthy");
    } else {
        warn!(
            database_connected = health.database_connected,
            model_configured = health.model_configured,
            "service starting unhealthy"
        );
    }

    let bind_addr = settings.bind_addr.clone();
    let app = api::router(AppState {
        service,
        settings: Arc::new(settings),
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!(addr = %bind_addr, "listening");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
