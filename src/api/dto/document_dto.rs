//! Relay DTOs for the save and document endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::protocol::ReplaceOptions;

/// JSON request body for `POST /api/document`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceDocumentRequest {
    /// New document content, encoded according to `type`. Required.
    #[serde(default)]
    pub content: Option<String>,
    /// `text` (default), `html`, or `base64`.
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    /// Font overrides, path check, and placement.
    #[serde(default)]
    pub options: Option<ReplaceOptions>,
    /// Caller-chosen command id. A UUID is generated when absent.
    #[serde(default)]
    pub id: Option<String>,
}

/// Multipart form accepted by `POST /api/document` (documentation only).
#[derive(Debug, ToSchema)]
pub struct DocumentUploadForm {
    /// File to place into the document.
    #[schema(format = Binary)]
    pub file: String,
    /// JSON-encoded [`ReplaceOptions`].
    pub options: Option<String>,
    /// Content type override; inferred from the file name otherwise.
    #[schema(rename = "type")]
    pub content_type: Option<String>,
}

/// Query parameters shared by the dispatch endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DispatchParams {
    /// Wait for the client's response before answering.
    #[serde(default)]
    pub wait: bool,
}

/// Response body for the dispatch endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct DispatchResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Id carried by the dispatched command.
    pub id: String,
}
