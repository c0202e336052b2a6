use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::accounts::{create_user, find_by_email, find_by_id, verify_credentials};
use crate::auth::extractor::AuthUser;
use crate::auth::jwt::issue_session_token;
use crate::auth::password::{hash_password, validate_password_strength};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::{UserProfile, UserRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserProfile,
}

fn open_session(state: &AppState, user: UserRow) -> Result<SessionResponse, AppError> {
    let token = issue_session_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign session token: {e}")))?;
    Ok(SessionResponse {
        token,
        user: user.into(),
    })
}

/// POST /auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    if request.name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }
    validate_password_strength(&request.password).map_err(AppError::Validation)?;

    if find_by_email(&state.db, &request.email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))?;

    let user = create_user(&state.db, &request.name, &request.email, &password_hash).await?;
    info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(open_session(&state, user)?)))
}

/// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }

    let user = verify_credentials(&state.db, &request.email, &request.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    Ok(Json(open_session(&state, user)?))
}

/// GET /auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let row = find_by_id(&state.db, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Account no longer exists".to_string()))?;
    Ok(Json(row.into()))
}
