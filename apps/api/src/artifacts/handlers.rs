use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::artifacts::store::{
    insert_cover_letter, insert_resume, list_cover_letters, list_resumes, NewCoverLetter,
};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::generation::resume::AnalysisResult;
use crate::models::resume::{CoverLetterRow, ResumeRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveResumeRequest {
    pub title: String,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCoverLetterRequest {
    pub title: String,
    pub content: String,
    pub job_description: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub resumes: Vec<ResumeRow>,
    pub cover_letters: Vec<CoverLetterRow>,
}

fn require_title(title: &str) -> Result<&str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    Ok(title)
}

/// POST /resumes
pub async fn handle_save_resume(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<SaveResumeRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let title = require_title(&request.title)?;
    let content = serde_json::to_string(&request.analysis)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize analysis: {e}")))?;

    let id = insert_resume(&state.db, user.user_id, title, &content).await?;
    info!("Saved resume {id} for user {}", user.user_id);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(list_resumes(&state.db, user.user_id).await?))
}

/// POST /cover-letters
pub async fn handle_save_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<SaveCoverLetterRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let title = require_title(&request.title)?;
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let id = insert_cover_letter(
        &state.db,
        user.user_id,
        NewCoverLetter {
            title,
            content: &request.content,
            job_description: request.job_description.as_deref(),
            company_name: request.company_name.as_deref(),
        },
    )
    .await?;
    info!("Saved cover letter {id} for user {}", user.user_id);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /cover-letters
pub async fn handle_list_cover_letters(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CoverLetterRow>>, AppError> {
    Ok(Json(list_cover_letters(&state.db, user.user_id).await?))
}

/// GET /dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let (resumes, cover_letters) = tokio::try_join!(
        list_resumes(&state.db, user.user_id),
        list_cover_letters(&state.db, user.user_id),
    )?;

    Ok(Json(DashboardResponse {
        resumes,
        cover_letters,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_title_trims() {
        assert_eq!(require_title("  My CV ").unwrap(), "My CV");
        assert!(require_title("   ").is_err());
    }

    #[test]
    fn test_save_cover_letter_request_optional_fields() {
        let request: SaveCoverLetterRequest = serde_json::from_value(serde_json::json!({
            "title": "Acme letter",
            "content": "Dear Dana,"
        }))
        .unwrap();
        assert!(request.job_description.is_none());
        assert!(request.company_name.is_none());
    }

    #[test]
    fn test_dashboard_serializes_camel_case() {
        let json = serde_json::to_value(DashboardResponse {
            resumes: vec![],
            cover_letters: vec![],
        })
        .unwrap();
        assert!(json.get("coverLetters").is_some());
    }
}
