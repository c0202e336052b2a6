//! Axum route handlers for the generation API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::generation::cover_letter::{CoverLetterRequest, CoverLetterResult};
use crate::generation::interview::{InterviewRequest, InterviewTurnResult};
use crate::generation::resume::{AnalysisResult, AnalyzeRequest};
use crate::generation::upload::extract_resume_text;
use crate::state::AppState;

/// POST /analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    request.validate()?;
    let analysis = state.generation.analyze_resume(&request).await?;
    Ok(Json(analysis))
}

/// POST /analyze/upload
///
/// Multipart form: `resume` (PDF or plain-text file) and `jobDescription`.
/// The extracted text is analyzed exactly like `POST /analyze`.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let mut multipart = multipart?;
    let mut resume_text = None;
    let mut job_description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read resume file: {e}")))?;

                let text = tokio::task::spawn_blocking(move || {
                    extract_resume_text(&bytes, content_type.as_deref(), file_name.as_deref())
                })
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Resume extraction task failed: {e}")))??;

                resume_text = Some(text);
            }
            "jobDescription" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read jobDescription: {e}")))?;
                job_description = Some(text);
            }
            _ => {}
        }
    }

    let request = AnalyzeRequest {
        resume_text: resume_text
            .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?,
        job_description: job_description.unwrap_or_default(),
    };
    request.validate()?;

    let analysis = state.generation.analyze_resume(&request).await?;
    Ok(Json(analysis))
}

/// POST /cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    AppJson(request): AppJson<CoverLetterRequest>,
) -> Result<Json<CoverLetterResult>, AppError> {
    request.validate()?;
    let letter = state.generation.generate_cover_letter(&request).await?;
    Ok(Json(letter))
}

/// POST /interview-turn
pub async fn handle_interview_turn(
    State(state): State<AppState>,
    AppJson(request): AppJson<InterviewRequest>,
) -> Result<Json<InterviewTurnResult>, AppError> {
    request.validate()?;
    let turn = state.generation.interview_turn(&request).await?;
    Ok(Json(turn))
}
