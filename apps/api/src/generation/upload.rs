//! Resume file to text.

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResumeFormat {
    Pdf,
    PlainText,
}

fn detect_format(content_type: Option<&str>, file_name: Option<&str>) -> Option<ResumeFormat> {
    let mime = content_type
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase());
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match (mime.as_deref(), extension.as_deref()) {
        (Some("application/pdf"), _) | (_, Some("pdf")) => Some(ResumeFormat::Pdf),
        (Some("text/plain"), _) | (_, Some("txt")) => Some(ResumeFormat::PlainText),
        _ => None,
    }
}

/// Extracts resume text from an uploaded PDF or plain-text file.
/// CPU-bound for PDFs; call from `spawn_blocking`.
pub fn extract_resume_text(
    bytes: &[u8],
    content_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<String, AppError> {
    let text = match detect_format(content_type, file_name) {
        Some(ResumeFormat::Pdf) => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::Validation(format!("Could not read PDF resume: {e}")))?,
        Some(ResumeFormat::PlainText) => String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::Validation("Resume text file is not valid UTF-8".to_string()))?,
        None => {
            return Err(AppError::Validation(
                "Unsupported resume format; upload a PDF or plain-text file".to_string(),
            ))
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the resume".to_string(),
        ));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_pdf_by_mime_or_extension() {
        assert_eq!(detect_format(Some("application/pdf"), None), Some(ResumeFormat::Pdf));
        assert_eq!(
            detect_format(Some("application/octet-stream"), Some("CV.PDF")),
            Some(ResumeFormat::Pdf)
        );
    }

    #[test]
    fn test_detects_plain_text() {
        assert_eq!(
            detect_format(Some("text/plain; charset=utf-8"), None),
            Some(ResumeFormat::PlainText)
        );
        assert_eq!(detect_format(None, Some("resume.txt")), Some(ResumeFormat::PlainText));
    }

    #[test]
    fn test_rejects_unknown_formats() {
        let err = extract_resume_text(b"PK..", Some("application/zip"), Some("resume.zip"));
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        let text = extract_resume_text(b"\n  Jane Doe\nRust engineer \n", Some("text/plain"), None).unwrap();
        assert_eq!(text, "Jane Doe\nRust engineer");
    }

    #[test]
    fn test_blank_text_file_is_rejected() {
        assert!(extract_resume_text(b"   ", None, Some("empty.txt")).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert!(extract_resume_text(&[0xff, 0xfe, 0x00], None, Some("r.txt")).is_err());
    }
}
