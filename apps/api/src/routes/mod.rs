pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::artifacts::handlers as artifacts;
use crate::auth::handlers as auth;
use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation
        .route("/analyze", post(generation::handle_analyze))
        .route("/analyze/upload", post(generation::handle_analyze_upload))
        .route("/cover-letter", post(generation::handle_cover_letter))
        .route("/interview-turn", post(generation::handle_interview_turn))
        // Accounts
        .route("/auth/register", post(auth::handle_register))
        .route("/auth/login", post(auth::handle_login))
        .route("/auth/me", get(auth::handle_me))
        // Saved artifacts
        .route(
            "/resumes",
            get(artifacts::handle_list_resumes).post(artifacts::handle_save_resume),
        )
        .route(
            "/cover-letters",
            get(artifacts::handle_list_cover_letters).post(artifacts::handle_save_cover_letter),
        )
        .route("/dashboard", get(artifacts::handle_dashboard))
        .with_state(state)
}
