//! Current-session extractor.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::jwt::validate_token;
use crate::errors::AppError;
use crate::state::AppState;

/// The signed-in account, taken from `Authorization: Bearer <token>`.
///
/// Add it as a handler argument to require a session:
///
/// ```ignore
/// async fn list(user: AuthUser) -> Result<Json<()>, AppError> { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Expected 'Authorization: Bearer <token>'".to_string())
        })?;

        let claims = validate_token(token.trim(), &state.config.jwt)
            .map_err(|_| AppError::Unauthorized("Invalid or expired session".to_string()))?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
