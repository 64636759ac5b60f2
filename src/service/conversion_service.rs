//! Conversion service: DOCX upload → standalone HTML page.

use std::sync::Arc;

use crate::convert::{ConvertError, DocumentConverter, HighlightRewriter, Upload, wrap_document};

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    /// Name of the uploaded file.
    pub filename: String,
    /// Complete HTML page.
    pub html: String,
}

/// Runs the converter off the async runtime and post-processes its output.
#[derive(Debug, Clone)]
pub struct ConversionService {
    converter: Arc<dyn DocumentConverter>,
    rewriter: HighlightRewriter,
}

impl ConversionService {
    /// Creates the service around `converter`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Internal`] if the highlight rule fails to
    /// compile.
    pub fn new(converter: Arc<dyn DocumentConverter>) -> Result<Self, ConvertError> {
        let rewriter = HighlightRewriter::new()
            .map_err(|e| ConvertError::Internal(format!("highlight rule: {e}")))?;
        Ok(Self {
            converter,
            rewriter,
        })
    }

    /// Converts a validated upload into a full HTML page.
    ///
    /// # Errors
    ///
    /// Propagates converter failures; returns [`ConvertError::Internal`] if
    /// the blocking worker dies.
    pub async fn convert(&self, upload: Upload) -> Result<ConvertedDocument, ConvertError> {
        let converter = Arc::clone(&self.converter);
        let bytes = upload.bytes;
        let markup = tokio::task::spawn_blocking(move || converter.convert(&bytes))
            .await
            .map_err(|e| ConvertError::Internal(format!("conversion worker failed: {e}")))??;

        tracing::info!(
            filename = %upload.filename,
            markup_len = markup.len(),
            "document converted"
        );

        let body = self.rewriter.rewrite(&markup);
        Ok(ConvertedDocument {
            filename: upload.filename,
            html: wrap_document(&body),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Bytes;

    use super::*;

    #[derive(Debug)]
    struct FixedConverter(&'static str);

    impl DocumentConverter for FixedConverter {
        fn convert(&self, _bytes: &[u8]) -> Result<String, ConvertError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Debug)]
    struct FailingConverter;

    impl DocumentConverter for FailingConverter {
        fn convert(&self, _bytes: &[u8]) -> Result<String, ConvertError> {
            Err(ConvertError::InvalidDocument("corrupt".into()))
        }
    }

    fn upload() -> Upload {
        Upload {
            filename: "a.docx".into(),
            bytes: Bytes::from_static(b"ignored"),
        }
    }

    #[tokio::test]
    async fn highlights_and_wraps_output() {
        let Ok(service) = ConversionService::new(Arc::new(FixedConverter(
            r#"<p><span style="background-color:yellow">key</span></p>"#,
        ))) else {
            panic!("service setup failed");
        };
        let Ok(doc) = service.convert(upload()).await else {
            panic!("conversion failed");
        };
        assert_eq!(doc.filename, "a.docx");
        assert!(doc.html.contains("<p><mark>key</mark></p>"));
        assert!(!doc.html.contains("<span"));
        assert!(doc.html.starts_with("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn converter_errors_propagate() {
        let Ok(service) = ConversionService::new(Arc::new(FailingConverter)) else {
            panic!("service setup failed");
        };
        let result = service.convert(upload()).await;
        assert!(matches!(result, Err(ConvertError::InvalidDocument(_))));
    }
}
