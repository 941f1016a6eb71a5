//! API error type mapped to status codes and JSON bodies.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::types::ErrorResponse;
use finx_core::{ExtractionError, FinxError};

/// Errors returned by the upload endpoints.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No file uploaded")]
    NoFile,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("Error reading file: {0}")]
    Unreadable(String),

    #[error("No matching data found in the file")]
    NoMatchingData,

    #[error("Unknown profile")]
    UnknownProfile(String),

    #[error("Invalid upload")]
    Multipart { status: StatusCode, detail: String },

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFile | ApiError::NoSelectedFile | ApiError::Unreadable(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Multipart { status, .. } => *status,
            ApiError::NoMatchingData | ApiError::UnknownProfile(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> Option<String> {
        match self {
            ApiError::UnknownProfile(name) => Some(format!("no profile named '{}'", name)),
            ApiError::Multipart { detail, .. } => Some(detail.clone()),
            _ => None,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart {
            status: err.status(),
            detail: err.body_text(),
        }
    }
}

impl From<FinxError> for ApiError {
    fn from(err: FinxError) -> Self {
        match err {
            FinxError::Decode(e) => ApiError::Unreadable(e.to_string()),
            FinxError::Extraction(ExtractionError::UnknownProfile(name)) => {
                ApiError::UnknownProfile(name)
            }
            FinxError::Extraction(e @ ExtractionError::Overflow(_)) => {
                ApiError::Unreadable(e.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        FinxError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!("Request failed: {}", detail);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
