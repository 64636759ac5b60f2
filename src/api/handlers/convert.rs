//! DOCX conversion endpoints.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{ConvertResponse, ConvertUploadForm};
use crate::app_state::ConvertState;
use crate::convert::{ConvertError, read_docx_upload};
use crate::service::ConvertedDocument;

/// `POST /convert`: Convert an uploaded `.docx` and return the HTML as JSON.
#[utoipa::path(
    post,
    path = "/convert",
    tag = "Conversion",
    summary = "Convert DOCX to HTML (JSON)",
    description = "Converts the uploaded `.docx` (max 10 MiB by default) into a standalone HTML page. Yellow highlights become `<mark>` elements.",
    request_body(content = ConvertUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Converted", body = ConvertResponse),
        (status = 400, description = "Missing file, wrong extension, or too large", body = ConvertResponse),
        (status = 500, description = "Conversion failed", body = ConvertResponse),
    )
)]
pub async fn convert_handler(
    State(state): State<ConvertState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Json<ConvertResponse>) {
    match convert_upload(&state, multipart).await {
        Ok(doc) => (StatusCode::OK, Json(ConvertResponse::converted(doc))),
        Err(err) => (err.status_code(), Json(ConvertResponse::failed(&err))),
    }
}

/// `POST /convert-download`: Convert an uploaded `.docx` and return it as
/// an HTML attachment.
#[utoipa::path(
    post,
    path = "/convert-download",
    tag = "Conversion",
    summary = "Convert DOCX to HTML (download)",
    description = "Same conversion as `/convert`, returned as `converted.html`. Failures are plain text.",
    request_body(content = ConvertUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "HTML attachment", body = String, content_type = "text/html"),
        (status = 400, description = "Missing file, wrong extension, or too large", body = String, content_type = "text/plain"),
        (status = 500, description = "Conversion failed", body = String, content_type = "text/plain"),
    )
)]
pub async fn convert_download_handler(
    State(state): State<ConvertState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match convert_upload(&state, multipart).await {
        Ok(doc) => (
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"converted.html\"",
                ),
            ],
            doc.html,
        )
            .into_response(),
        Err(err) => (
            err.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("conversion failed: {err}"),
        )
            .into_response(),
    }
}

async fn convert_upload(
    state: &ConvertState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ConvertedDocument, ConvertError> {
    let result = async {
        let multipart = multipart.map_err(|e| ConvertError::Multipart(e.body_text()))?;
        let upload = read_docx_upload(multipart, state.max_upload_bytes).await?;
        tracing::info!(filename = %upload.filename, size = upload.bytes.len(), "converting upload");
        state.conversion_service.convert(upload).await
    }
    .await;

    if let Err(err) = &result {
        if err.is_validation() {
            tracing::warn!(error = %err, "upload rejected");
        } else {
            tracing::error!(error = %err, "conversion failed");
        }
    }
    result
}

/// Conversion routes.
pub fn routes() -> Router<ConvertState> {
    Router::new()
        .route("/convert", post(convert_handler))
        .route("/convert-download", post(convert_download_handler))
}
