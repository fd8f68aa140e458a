//! Structural checks on segmented documents.

mod validate;

pub use validate::{validate_document, validate_page, ValidationResult};
