use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::generation::service::GenerationService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Orchestrators for the three generation tasks. Owns the model client and the
    /// response cache.
    pub generation: Arc<GenerationService>,
    pub config: Config,
}
