mod chat;
mod config;
mod db;
mod errors;
mod identity;
mod llm_client;
mod models;
mod notifications;
mod profile;
mod progress;
mod roadmap;
mod routes;
mod state;
mod store;
mod study_plan;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StoreBackend};
use crate::db::create_pool;
use crate::llm_client::{LanguageModel, LlmClient, OfflineModel};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Waypoint API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres backend"))?;
            let pool = create_pool(url).await?;
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    info!("Store backend: {}", store.backend());

    let llm: Arc<dyn LanguageModel> = match config.anthropic_api_key.clone() {
        Some(key) => {
            let client = LlmClient::new(key)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(client)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; generators will use templates");
            Arc::new(OfflineModel)
        }
    };

    let state = AppState {
        store,
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
