//! Request handlers.

use super::error::ApiError;
use super::AppState;
use crate::convert::{convert, Upload};
use crate::format::DocumentKind;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const SCRIPT_JS: &str = include_str!("../../assets/script.js");

/// `GET /`: the drag-and-drop upload page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /static/script.js`: the upload page's client script.
pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /convert`: multipart form with a `file` field, answered with the PDF.
pub async fn convert_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(ApiError::from_multipart)? {
        debug!(
            "Received field: name={:?}, filename={:?}",
            field.name(),
            field.file_name()
        );
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(ApiError::from_multipart)?;
        upload = Some(Upload::new(filename, bytes.to_vec()));
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::Validation("No file uploaded".to_string()))?;
    if upload.filename.is_empty() {
        return Err(ApiError::Validation("No file selected".to_string()));
    }
    // Reject before any conversion work is scheduled.
    DocumentKind::detect(&upload.filename)?;

    info!("Received '{}' ({} bytes)", upload.filename, upload.bytes.len());
    let output = convert(upload, &state.config).await?;

    let disposition = format!("attachment; filename=\"{}\"", output.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output.pdf,
    )
        .into_response())
}
