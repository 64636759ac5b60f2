//! [`DocumentHost`] backed by a file on disk.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use super::host::{DocumentBody, DocumentHost, FontOverrides, HostError, Placement};

#[derive(Debug)]
struct Buffer {
    bytes: Vec<u8>,
    dirty: bool,
}

/// Edits a document file through an in-memory buffer.
///
/// `mutate` changes the buffer only; `save` writes it back. The document
/// counts as unsaved while the buffer holds changes not yet written.
#[derive(Debug)]
pub struct FileHost {
    path: PathBuf,
    buffer: Mutex<Buffer>,
}

impl FileHost {
    /// Opens `path`, loading its current content. A missing file starts
    /// empty and is created on the first save.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Io`] if the file exists but cannot be read or
    /// the path cannot be made absolute.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = std::path::absolute(path.as_ref())?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        tracing::info!(path = %path.display(), size = bytes.len(), "document opened");

        Ok(Self {
            path,
            buffer: Mutex::new(Buffer {
                bytes,
                dirty: false,
            }),
        })
    }
}

impl DocumentHost for FileHost {
    async fn mutate(&self, body: DocumentBody, placement: Placement) -> Result<(), HostError> {
        let bytes = body.into_bytes();
        let mut buffer = self.buffer.lock().await;
        match placement {
            Placement::Replace => buffer.bytes = bytes,
            Placement::Append => buffer.bytes.extend_from_slice(&bytes),
        }
        buffer.dirty = true;
        Ok(())
    }

    async fn apply_font(&self, font: &FontOverrides) -> Result<(), HostError> {
        // Plain files carry no formatting.
        tracing::debug!(?font, "font overrides ignored for file documents");
        Ok(())
    }

    async fn flush(&self) -> Result<(), HostError> {
        Ok(())
    }

    async fn save(&self) -> Result<(), HostError> {
        let mut buffer = self.buffer.lock().await;
        tokio::fs::write(&self.path, &buffer.bytes).await?;
        buffer.dirty = false;
        tracing::info!(path = %self.path.display(), size = buffer.bytes.len(), "document saved");
        Ok(())
    }

    async fn is_saved(&self) -> Result<bool, HostError> {
        Ok(!self.buffer.lock().await.dirty)
    }

    async fn document_path(&self) -> Result<Option<String>, HostError> {
        Ok(Some(self.path.display().to_string()))
    }
}
