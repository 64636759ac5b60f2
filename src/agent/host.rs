//! Capability interface over the document editor.

use std::future::Future;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

pub use crate::protocol::Placement;
use crate::protocol::{ContentType, ReplaceOptions};

/// Errors raised by a [`DocumentHost`].
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// No document is open or the editor is not reachable.
    #[error("document host unavailable: {0}")]
    Unavailable(String),

    /// The command payload could not be turned into a document body.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Filesystem failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The editor rejected the operation.
    #[error("{0}")]
    Operation(String),
}

/// Decoded content of a `replace` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBody {
    /// Plain text.
    Text(String),
    /// HTML markup.
    Html(String),
    /// Raw document bytes (decoded from base64).
    Binary(Vec<u8>),
}

impl DocumentBody {
    /// Decodes wire content according to its declared type.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidPayload`] if `base64` content does not
    /// decode.
    pub fn from_payload(content: String, content_type: ContentType) -> Result<Self, HostError> {
        match content_type {
            ContentType::Text => Ok(Self::Text(content)),
            ContentType::Html => Ok(Self::Html(content)),
            ContentType::Base64 => BASE64
                .decode(content.trim())
                .map(Self::Binary)
                .map_err(|e| HostError::InvalidPayload(format!("base64 content: {e}"))),
        }
    }

    /// Raw bytes as they would be written to disk.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(s) | Self::Html(s) => s.into_bytes(),
            Self::Binary(b) => b,
        }
    }
}

/// Font forced onto the whole document after a replace.
#[derive(Debug, Clone, PartialEq)]
pub struct FontOverrides {
    /// Font family.
    pub name: Option<String>,
    /// Size in points.
    pub size: Option<f32>,
}

impl FontOverrides {
    /// Extracts the font settings from replace options, if any are set.
    #[must_use]
    pub fn from_options(options: &ReplaceOptions) -> Option<Self> {
        let name = options.font_name.clone().filter(|n| !n.trim().is_empty());
        let size = options.font_size.filter(|s| s.is_finite() && *s > 0.0);
        if name.is_none() && size.is_none() {
            return None;
        }
        Some(Self { name, size })
    }
}

/// Operations the bridge agent needs from a document editor.
///
/// Implementations wrap whatever automation surface the editor offers. All
/// methods are async because real hosts cross a process boundary.
pub trait DocumentHost: Send + Sync + 'static {
    /// Replaces or appends to the document body.
    fn mutate(
        &self,
        body: DocumentBody,
        placement: Placement,
    ) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Applies font family and/or size to the whole body.
    fn apply_font(
        &self,
        font: &FontOverrides,
    ) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Pushes pending edits through to the editor.
    fn flush(&self) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Saves the document.
    fn save(&self) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Whether the document has no unsaved changes.
    fn is_saved(&self) -> impl Future<Output = Result<bool, HostError>> + Send;

    /// Full path of the open document, if it has one.
    fn document_path(&self) -> impl Future<Output = Result<Option<String>, HostError>> + Send;
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn base64_payload_is_decoded() {
        let Ok(body) = DocumentBody::from_payload("aGk=".into(), ContentType::Base64) else {
            panic!("valid base64");
        };
        assert_eq!(body, DocumentBody::Binary(b"hi".to_vec()));
    }

    #[test]
    fn bad_base64_is_invalid_payload() {
        let result = DocumentBody::from_payload("%%%".into(), ContentType::Base64);
        assert!(matches!(result, Err(HostError::InvalidPayload(_))));
    }

    #[test]
    fn font_overrides_ignore_empty_options() {
        assert!(FontOverrides::from_options(&ReplaceOptions::default()).is_none());

        let options = ReplaceOptions {
            font_name: Some(" ".into()),
            font_size: Some(12.0),
            ..ReplaceOptions::default()
        };
        let Some(font) = FontOverrides::from_options(&options) else {
            panic!("size alone is an override");
        };
        assert!(font.name.is_none());
        assert_eq!(font.size, Some(12.0));
    }
}
