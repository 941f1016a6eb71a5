//! HTTP request handlers for API endpoints

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::types::{HealthResponse, RetrieveResponse, UploadResponse};
use crate::AppState;
use finx_core::{extract_invoices, extract_settlement, Upload};

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// Aggregate an uploaded settlement report.
pub async fn retrieve(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RetrieveResponse>, ApiError> {
    let field = state.config.server.settlement_field.clone();
    let upload = read_uploads(&mut multipart, &field)
        .await?
        .into_iter()
        .next()
        .ok_or(ApiError::NoFile)?;

    if upload.file_name.is_empty() {
        return Err(ApiError::NoSelectedFile);
    }
    info!("Settlement report upload: {} ({} bytes)", upload.file_name, upload.data.len());

    let config = state.config.clone();
    let report = tokio::task::spawn_blocking(move || {
        extract_settlement(&upload.data, &upload.file_name, &config.extraction)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    if report.records.is_empty() {
        return Err(ApiError::NoMatchingData);
    }

    Ok(Json(RetrieveResponse {
        status: "success",
        date: report.date,
        data: report.records,
    }))
}

/// Extract invoices with the default profile.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    process_invoices(state, None, multipart).await
}

/// Extract invoices with a named profile.
pub async fn upload_profile(
    State(state): State<AppState>,
    Path(profile): Path<String>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    process_invoices(state, Some(profile), multipart).await
}

async fn process_invoices(
    state: AppState,
    profile: Option<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let extractor = state.extractor(profile.as_deref())?;

    let field = state.config.server.invoice_field.clone();
    let mut uploads = read_uploads(&mut multipart, &field).await?;
    if uploads.is_empty() {
        return Err(ApiError::NoFile);
    }
    uploads.retain(|u| !u.file_name.is_empty());
    if uploads.is_empty() {
        return Err(ApiError::NoSelectedFile);
    }
    info!(
        "Invoice upload: {} files, profile {}",
        uploads.len(),
        profile.as_deref().unwrap_or(&state.config.extraction.default_profile)
    );

    let source = state.source.clone();
    let batch =
        tokio::task::spawn_blocking(move || extract_invoices(&uploads, source.as_ref(), &extractor))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(UploadResponse {
        status: "success",
        data: batch.records,
        skipped: batch.skipped,
    }))
}

/// Collect every file sent under `field_name`; other fields are ignored.
async fn read_uploads(multipart: &mut Multipart, field_name: &str) -> Result<Vec<Upload>, ApiError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        uploads.push(Upload::new(file_name, data.to_vec()));
    }

    Ok(uploads)
}
