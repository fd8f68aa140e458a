//! Data model types for page-grouped reports.

mod blocks;
mod document;

pub use blocks::{GenericLine, MetadataField, Report, TestSummary};
pub use document::{Document, Page};
