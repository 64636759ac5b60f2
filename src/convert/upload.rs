//! Upload extraction and validation for the conversion endpoints.
//!
//! The extension filter runs on the part's file name before any of its
//! bytes are read, and the size cap is enforced while streaming, so a
//! rejected upload never reaches the converter.

use std::path::Path;

use axum::body::Bytes;
use axum::extract::Multipart;

use super::ConvertError;

/// A validated `.docx` upload held in memory.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Original file name as sent by the client.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Bytes,
}

/// Accepts only file names ending in `.docx` (any case).
///
/// # Errors
///
/// Returns [`ConvertError::UnsupportedExtension`] for anything else.
pub fn validate_filename(filename: &str) -> Result<(), ConvertError> {
    let is_docx = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
    if is_docx {
        Ok(())
    } else {
        Err(ConvertError::UnsupportedExtension(filename.to_string()))
    }
}

/// Reads the `file` part of a multipart body.
///
/// Other parts are skipped.
///
/// # Errors
///
/// - [`ConvertError::MissingFile`] if no `file` part is present.
/// - [`ConvertError::UnsupportedExtension`] if the file is not a `.docx`.
/// - [`ConvertError::TooLarge`] if the file exceeds `max_bytes`.
/// - [`ConvertError::Multipart`] if the body is malformed.
pub async fn read_docx_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<Upload, ConvertError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ConvertError::Multipart(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        validate_filename(&filename)?;

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ConvertError::Multipart(e.body_text()))?
        {
            if data.len().saturating_add(chunk.len()) > max_bytes {
                return Err(ConvertError::TooLarge { limit: max_bytes });
            }
            data.extend_from_slice(&chunk);
        }

        tracing::debug!(%filename, size = data.len(), "upload received");
        return Ok(Upload {
            filename,
            bytes: Bytes::from(data),
        });
    }

    Err(ConvertError::MissingFile)
}
