mod artifacts;
mod auth;
mod cache;
mod config;
mod db;
mod errors;
mod extract;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::generation::service::{GenerationCache, GenerationService};
use crate::llm_client::{GeminiClient, ModelClient};
use crate::routes::build_router;
use crate::state::AppState;

/// How often expired cache entries are swept.
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerCatalyst API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let model = GeminiClient::new(config.gemini_api_key.clone())?;
    if model.is_configured() {
        info!("Gemini client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("GEMINI_API_KEY is not set. AI features will use mock responses.");
    }

    let cache = Arc::new(GenerationCache::new());
    spawn_cache_janitor(Arc::clone(&cache));

    let generation = Arc::new(GenerationService::new(
        Arc::new(model),
        cache,
        config.cache_ttl,
    ));
    info!("Generation cache TTL: {}s", config.cache_ttl.as_secs());

    let state = AppState {
        db,
        generation,
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins once the frontend domain is fixed
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_cache_janitor(cache: Arc<GenerationCache>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = cache.purge_expired().await;
            if removed > 0 {
                debug!(
                    "Purged {removed} expired cache entries ({} live)",
                    cache.len().await
                );
            }
        }
    });
}
