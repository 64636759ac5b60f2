//! OpenAPI documents for both HTTP servers.

use utoipa::OpenApi;

use crate::api::dto::{
    ConvertResponse, ConvertUploadForm, DispatchResponse, DocumentUploadForm,
    ReplaceDocumentRequest,
};
use crate::api::handlers::system::HealthResponse;
use crate::api::handlers::{convert, document, system};
use crate::error::{ErrorBody, ErrorResponse};
use crate::protocol::{ContentType, Placement, ReplaceOptions};

/// OpenAPI description of the relay server.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        system::health_handler,
        document::save_document,
        document::replace_document,
    ),
    components(schemas(
        HealthResponse,
        DispatchResponse,
        ReplaceDocumentRequest,
        DocumentUploadForm,
        ReplaceOptions,
        ContentType,
        Placement,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Liveness"),
        (name = "Relay", description = "Commands forwarded to the connected bridge client"),
    )
)]
pub struct RelayApiDoc;

/// OpenAPI description of the conversion server.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(convert::convert_handler, convert::convert_download_handler),
    components(schemas(ConvertResponse, ConvertUploadForm)),
    tags((name = "Conversion", description = "DOCX to HTML conversion"))
)]
pub struct ConvertApiDoc;
