//! Conversion seam and its error type.

use std::fmt::Debug;

use axum::http::StatusCode;

/// Errors raised anywhere in the conversion pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The multipart body had no `file` field.
    #[error("please upload a file")]
    MissingFile,

    /// The uploaded file is not a `.docx`.
    #[error("only .docx files are supported (got {0:?})")]
    UnsupportedExtension(String),

    /// The upload exceeded the configured size cap.
    #[error("file exceeds the {limit} byte upload limit")]
    TooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The multipart body could not be read.
    #[error("malformed upload: {0}")]
    Multipart(String),

    /// The converter could not make sense of the document.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Internal failure (worker panicked, regex setup failed).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// Returns `true` for errors caused by the request rather than the
    /// converter.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingFile
                | Self::UnsupportedExtension(_)
                | Self::TooLarge { .. }
                | Self::Multipart(_)
        )
    }

    /// HTTP status for this error: 400 for validation, 500 otherwise.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Turns a binary document into HTML body markup.
///
/// Implementations are opaque to the server: the bundled
/// [`super::DocxConverter`] is used in production, tests substitute their
/// own. Conversion is CPU-bound and runs on the blocking pool.
pub trait DocumentConverter: Debug + Send + Sync + 'static {
    /// Converts `bytes` into an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidDocument`] when the input cannot be
    /// parsed.
    fn convert(&self, bytes: &[u8]) -> Result<String, ConvertError>;
}
