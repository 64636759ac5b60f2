//! Conversion server DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::convert::ConvertError;
use crate::service::ConvertedDocument;

/// Response body for `POST /convert`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConvertResponse {
    /// Whether conversion succeeded.
    pub success: bool,
    /// Complete HTML page on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Uploaded file name on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConvertResponse {
    /// Success body for a converted document.
    #[must_use]
    pub fn converted(doc: ConvertedDocument) -> Self {
        Self {
            success: true,
            html: Some(doc.html),
            filename: Some(doc.filename),
            error: None,
        }
    }

    /// Failure body for `err`.
    #[must_use]
    pub fn failed(err: &ConvertError) -> Self {
        Self {
            success: false,
            html: None,
            filename: None,
            error: Some(err.to_string()),
        }
    }
}

/// Multipart form accepted by the conversion endpoints (documentation only).
#[derive(Debug, ToSchema)]
pub struct ConvertUploadForm {
    /// `.docx` file to convert.
    #[schema(format = Binary)]
    pub file: String,
}
