use crate::domain::ValidationError;
use crate::io::UploadError;
use crate::services::ContentError;
use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid {}: {}", .0.field, .0.message)]
    Validation(#[from] ValidationError),

    #[error("Upload too large: {size} bytes (max {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Request body too large")]
    BodyTooLarge,

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge { .. } | AppError::BodyTooLarge => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Internal(e) = &self {
            // the cause stays in the logs, the client only sees a generic message
            tracing::error!(error = ?e, "request failed");
        }

        let body = match &self {
            AppError::Validation(v) => json!({ "error": self.to_string(), "field": v.field }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ContentError> for AppError {
    fn from(e: ContentError) -> Self {
        match e {
            ContentError::NotFound { collection, id } => {
                AppError::NotFound(format!("{collection} item {id}"))
            }
            ContentError::Invalid(v) => AppError::Validation(v),
            ContentError::Store(e) => AppError::Internal(e),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Empty => AppError::BadRequest("empty upload".to_string()),
            UploadError::TooLarge { size, max } => AppError::PayloadTooLarge { size, max },
            UploadError::NotAnImage(reason) => AppError::UnsupportedMedia(reason),
        }
    }
}

// hitting the body limit is a 413, every other rejection is the client's malformed input
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::BodyTooLarge
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::BodyTooLarge
        } else {
            AppError::BadRequest(format!("malformed multipart body: {}", e.body_text()))
        }
    }
}
