//! REST endpoint handlers organized by resource.

pub mod convert;
pub mod document;
pub mod system;
