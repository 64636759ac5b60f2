//! In-memory [`DocumentHost`] for tests and dry runs.

use tokio::sync::Mutex;

use super::host::{DocumentBody, DocumentHost, FontOverrides, HostError, Placement};

/// Observable state of a [`MemoryHost`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySnapshot {
    /// Body blocks in document order.
    pub blocks: Vec<DocumentBody>,
    /// Last applied font overrides.
    pub font: Option<FontOverrides>,
    /// Saved flag.
    pub saved: bool,
    /// Document path, if any.
    pub path: Option<String>,
    /// Number of successful `mutate` calls.
    pub mutations: usize,
    /// Number of `flush` calls.
    pub flushes: usize,
    /// Number of successful `save` calls.
    pub saves: usize,
}

#[derive(Debug, Default)]
struct MemoryState {
    doc: MemorySnapshot,
    failure: Option<String>,
}

/// Document held entirely in memory.
///
/// Starts saved. Mutations clear the saved flag and `save` sets it again.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<MemoryState>,
}

impl MemoryHost {
    /// Creates a saved, empty document at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                doc: MemorySnapshot {
                    saved: true,
                    path: Some(path.into()),
                    ..MemorySnapshot::default()
                },
                failure: None,
            }),
        }
    }

    /// Current state.
    pub async fn snapshot(&self) -> MemorySnapshot {
        self.state.lock().await.doc.clone()
    }

    /// Overrides the saved flag, as a user saving in the editor would.
    pub async fn set_saved(&self, saved: bool) {
        self.state.lock().await.doc.saved = saved;
    }

    /// Changes the document path.
    pub async fn set_path(&self, path: Option<String>) {
        self.state.lock().await.doc.path = path;
    }

    /// Makes `mutate` and `save` fail with `message` until cleared with
    /// `None`.
    pub async fn set_failure(&self, message: Option<String>) {
        self.state.lock().await.failure = message;
    }
}

impl DocumentHost for MemoryHost {
    async fn mutate(&self, body: DocumentBody, placement: Placement) -> Result<(), HostError> {
        let mut state = self.state.lock().await;
        if let Some(message) = &state.failure {
            return Err(HostError::Operation(message.clone()));
        }
        if placement == Placement::Replace {
            state.doc.blocks.clear();
        }
        state.doc.blocks.push(body);
        state.doc.saved = false;
        state.doc.mutations += 1;
        Ok(())
    }

    async fn apply_font(&self, font: &FontOverrides) -> Result<(), HostError> {
        self.state.lock().await.doc.font = Some(font.clone());
        Ok(())
    }

    async fn flush(&self) -> Result<(), HostError> {
        self.state.lock().await.doc.flushes += 1;
        Ok(())
    }

    async fn save(&self) -> Result<(), HostError> {
        let mut state = self.state.lock().await;
        if let Some(message) = &state.failure {
            return Err(HostError::Operation(message.clone()));
        }
        state.doc.saved = true;
        state.doc.saves += 1;
        Ok(())
    }

    async fn is_saved(&self) -> Result<bool, HostError> {
        Ok(self.state.lock().await.doc.saved)
    }

    async fn document_path(&self) -> Result<Option<String>, HostError> {
        Ok(self.state.lock().await.doc.path.clone())
    }
}
