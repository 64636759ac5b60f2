//! DOCX → HTML conversion.
//!
//! The pipeline is: validate the upload ([`upload`]), turn the container
//! into body markup ([`DocumentConverter`]), rewrite yellow-background spans
//! into `<mark>` ([`HighlightRewriter`]), and wrap the result in a fixed
//! HTML page ([`wrap_document`]).

pub mod converter;
pub mod docx;
pub mod highlight;
pub mod shell;
pub mod upload;

pub use converter::{ConvertError, DocumentConverter};
pub use docx::DocxConverter;
pub use highlight::HighlightRewriter;
pub use shell::wrap_document;
pub use upload::{Upload, read_docx_upload, validate_filename};
