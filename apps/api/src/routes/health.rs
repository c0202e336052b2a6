use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service status plus whether generation runs against the live model or mocks.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let ai_mode = if state.generation.is_live() { "live" } else { "mock" };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "catalyst-api",
        "aiMode": ai_mode
    }))
}
