//! Shared application state injected into Axum handlers.

use std::sync::Arc;

use crate::service::{ConversionService, RelayService};

/// State for the relay server's handlers, available via Axum's `State`
/// extractor.
#[derive(Debug, Clone)]
pub struct RelayState {
    /// Relay service for dispatch and client tracking.
    pub relay_service: Arc<RelayService>,
}

/// State for the conversion server's handlers.
#[derive(Debug, Clone)]
pub struct ConvertState {
    /// Conversion pipeline.
    pub conversion_service: Arc<ConversionService>,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
}
