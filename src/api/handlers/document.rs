//! Save and replace endpoints: REST calls translated into bridge commands.

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::header;
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::api::dto::{DispatchParams, DispatchResponse, ReplaceDocumentRequest};
use crate::app_state::RelayState;
use crate::error::{ErrorResponse, RelayError};
use crate::protocol::{Command, ContentType, ReplaceOptions, ReplacePayload};

/// `POST /api/save`: Ask the client to save the open document.
///
/// # Errors
///
/// Returns [`RelayError::NotConnected`] when no client is connected, and
/// the reply errors of [`crate::service::RelayService::dispatch_and_wait`]
/// when `wait=true`.
#[utoipa::path(
    post,
    path = "/api/save",
    tag = "Relay",
    summary = "Save the open document",
    description = "Pushes a `save` command to the connected bridge client. Returns as soon as the command is sent unless `wait=true`.",
    params(DispatchParams),
    responses(
        (status = 200, description = "Command sent (or applied with wait=true)", body = DispatchResponse),
        (status = 502, description = "Client reported an error", body = ErrorResponse),
        (status = 503, description = "No client connected", body = ErrorResponse),
        (status = 504, description = "Client did not answer in time", body = ErrorResponse),
    )
)]
pub async fn save_document(
    State(state): State<RelayState>,
    Query(params): Query<DispatchParams>,
) -> Result<Json<DispatchResponse>, RelayError> {
    let command = Command::save(new_command_id());
    deliver(&state, command, params.wait, "Save").await
}

/// `POST /api/document`: Replace the open document's content.
///
/// Accepts either a JSON body or a multipart upload (`file`, optional
/// `options` JSON and `type`). Connectivity is checked before the body is
/// read.
///
/// # Errors
///
/// Returns [`RelayError::NotConnected`] when no client is connected,
/// [`RelayError::InvalidRequest`] / [`RelayError::UnsupportedContentType`]
/// for bad input, and the reply errors when `wait=true`.
#[utoipa::path(
    post,
    path = "/api/document",
    tag = "Relay",
    summary = "Replace document content",
    description = "Pushes a `replace` command carrying inline content or an uploaded file to the connected bridge client.",
    params(DispatchParams),
    request_body = ReplaceDocumentRequest,
    responses(
        (status = 200, description = "Command sent (or applied with wait=true)", body = DispatchResponse),
        (status = 400, description = "Missing content or bad upload", body = ErrorResponse),
        (status = 502, description = "Client reported an error", body = ErrorResponse),
        (status = 503, description = "No client connected", body = ErrorResponse),
        (status = 504, description = "Client did not answer in time", body = ErrorResponse),
    )
)]
pub async fn replace_document(
    State(state): State<RelayState>,
    Query(params): Query<DispatchParams>,
    request: Request,
) -> Result<Json<DispatchResponse>, RelayError> {
    if !state.relay_service.is_connected().await {
        return Err(RelayError::NotConnected);
    }

    let (id, payload) = read_replace_request(request).await?;
    let command = Command::replace(id.unwrap_or_else(new_command_id), payload);
    deliver(&state, command, params.wait, "Replace").await
}

async fn deliver(
    state: &RelayState,
    command: Command,
    wait: bool,
    label: &str,
) -> Result<Json<DispatchResponse>, RelayError> {
    let id = command.id.clone().unwrap_or_default();
    let message = if wait {
        state.relay_service.dispatch_and_wait(&command).await?;
        format!("{label} command applied")
    } else {
        state.relay_service.dispatch(&command).await?;
        format!("{label} command sent")
    };
    Ok(Json(DispatchResponse { message, id }))
}

fn new_command_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

async fn read_replace_request(
    request: Request,
) -> Result<(Option<String>, ReplacePayload), RelayError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| RelayError::InvalidRequest(e.body_text()))?;
        let payload = read_multipart_upload(multipart).await?;
        Ok((None, payload))
    } else {
        let Json(body) = Json::<ReplaceDocumentRequest>::from_request(request, &())
            .await
            .map_err(|e| RelayError::InvalidRequest(e.body_text()))?;
        payload_from_json(body)
    }
}

fn payload_from_json(
    body: ReplaceDocumentRequest,
) -> Result<(Option<String>, ReplacePayload), RelayError> {
    let content = body
        .content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| RelayError::InvalidRequest("content is required".to_string()))?;
    let content_type = parse_content_type(body.content_type.as_deref())?;
    let id = body.id.filter(|id| !id.trim().is_empty());

    Ok((
        id,
        ReplacePayload {
            content,
            content_type,
            options: body.options,
        },
    ))
}

/// Blank or missing means `text`.
fn parse_content_type(raw: Option<&str>) -> Result<ContentType, RelayError> {
    match raw.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(ContentType::default()),
        Some(t) => {
            ContentType::parse(t).ok_or_else(|| RelayError::UnsupportedContentType(t.to_string()))
        }
    }
}

async fn read_multipart_upload(mut multipart: Multipart) -> Result<ReplacePayload, RelayError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut options: Option<ReplaceOptions> = None;
    let mut requested_type: Option<ContentType> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, data));
            }
            "options" => {
                let raw = field.text().await.map_err(multipart_error)?;
                if !raw.trim().is_empty() {
                    let parsed = serde_json::from_str::<ReplaceOptions>(&raw).map_err(|e| {
                        RelayError::InvalidRequest(format!("invalid options: {e}"))
                    })?;
                    options = Some(parsed);
                }
            }
            "type" => {
                let raw = field.text().await.map_err(multipart_error)?;
                if !raw.trim().is_empty() {
                    requested_type = Some(parse_content_type(Some(&raw))?);
                }
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| RelayError::InvalidRequest("file is required".to_string()))?;
    if data.is_empty() {
        return Err(RelayError::InvalidRequest(
            "uploaded file is empty".to_string(),
        ));
    }

    let content_type =
        requested_type.unwrap_or_else(|| ContentType::infer_from_filename(&filename));
    let content = encode_upload(&data, content_type)?;
    tracing::debug!(%filename, size = data.len(), ?content_type, "document upload received");

    Ok(ReplacePayload {
        content,
        content_type,
        options,
    })
}

fn encode_upload(data: &[u8], content_type: ContentType) -> Result<String, RelayError> {
    match content_type {
        ContentType::Base64 => Ok(BASE64.encode(data)),
        ContentType::Text | ContentType::Html => std::str::from_utf8(data)
            .map(str::to_owned)
            .map_err(|_| {
                RelayError::InvalidRequest(format!(
                    "{content_type:?} upload is not valid UTF-8"
                ))
            }),
    }
}

fn multipart_error(err: MultipartError) -> RelayError {
    RelayError::InvalidRequest(err.body_text())
}

/// Document routes.
pub fn routes() -> Router<RelayState> {
    Router::new()
        .route("/api/save", post(save_document))
        .route("/api/document", post(replace_document))
}
