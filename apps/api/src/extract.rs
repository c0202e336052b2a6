//! Request extractors whose rejections render as `AppError`.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use tracing::debug;

use crate::errors::AppError;

/// `axum::Json` with rejections mapped to a 400 `VALIDATION_ERROR`.
/// Serde's message names internal fields and positions, so it is only logged.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected JSON body: {}", rejection.body_text());
        let message = match rejection {
            JsonRejection::JsonDataError(_) => {
                "Request body is missing required fields or has invalid values"
            }
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::MissingJsonContentType(_) => {
                "Expected a request body with Content-Type: application/json"
            }
            _ => "Request body could not be read",
        };
        AppError::Validation(message.to_string())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        debug!("Rejected multipart body: {}", rejection.body_text());
        AppError::Validation("Expected a multipart/form-data request body".to_string())
    }
}
