use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use shared::ErrorResponse;

use crate::gemini::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("No image provided")]
    MissingImage,
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),
    #[error("Image of {size} bytes exceeds the {limit} byte limit")]
    ImageTooLarge { size: usize, limit: usize },
    #[error("Malformed upload: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
    #[error("Upstream model error: {0}")]
    Upstream(#[from] ModelError),
}

impl AnalyzeError {
    fn body(&self) -> ErrorResponse {
        let (error, details) = match self {
            AnalyzeError::MissingApiKey => ("Server configuration error", None),
            AnalyzeError::MissingImage => ("No image provided", None),
            AnalyzeError::UnsupportedImageType(t) => ("Unsupported image type", Some(t.clone())),
            AnalyzeError::ImageTooLarge { .. } => ("Image too large", Some(self.to_string())),
            AnalyzeError::Multipart(e) => ("Invalid upload", Some(e.to_string())),
            AnalyzeError::Upstream(e) => ("Failed to analyze image", Some(e.to_string())),
        };
        ErrorResponse {
            error: error.to_string(),
            details,
        }
    }
}

impl ResponseError for AnalyzeError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalyzeError::MissingApiKey | AnalyzeError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AnalyzeError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AnalyzeError::MissingImage
            | AnalyzeError::UnsupportedImageType(_)
            | AnalyzeError::Multipart(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}
