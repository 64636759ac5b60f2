//! Service layer: business logic orchestration.
//!
//! [`RelayService`] owns the active-client slot and reply correlation for
//! the relay server. [`ConversionService`] drives the DOCX → HTML pipeline
//! for the conversion server.

pub mod conversion_service;
pub mod relay_service;

pub use conversion_service::{ConversionService, ConvertedDocument};
pub use relay_service::RelayService;
