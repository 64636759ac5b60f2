//! Data Transfer Objects for REST request/response serialization.

pub mod convert_dto;
pub mod document_dto;

pub use convert_dto::*;
pub use document_dto::*;
