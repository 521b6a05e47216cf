//! HTTP error responses.
//!
//! Every failure leaves the server as JSON `{"error": "..."}` with a status
//! that tells the client whether retrying with a different upload can help.

use crate::error::ConvertError;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request itself is unusable: no file, no name, wrong extension.
    #[error("{0}")]
    Validation(String),

    /// The body exceeds the configured upload cap.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The document was accepted but could not be converted.
    #[error("Conversion failed: {0}")]
    Conversion(ConvertError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// A multipart body that could not be read. Bodies cut off by the size
    /// limit surface here too, with status 413.
    pub fn from_multipart(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::Validation(format!("Failed to read upload: {}", err.body_text()))
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(_: MultipartRejection) -> Self {
        ApiError::Validation("No file uploaded".to_string())
    }
}

impl From<ConvertError> for ApiError {
    fn from(err: ConvertError) -> Self {
        match err {
            e if e.is_validation() => ApiError::Validation(e.to_string()),
            e @ ConvertError::TooLarge { .. } => ApiError::PayloadTooLarge(e.to_string()),
            e => ApiError::Conversion(e),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
