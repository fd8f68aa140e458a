//! Validation logic for segmented reports.

use crate::model::{Document, Page};
use std::collections::HashSet;
use std::fmt::Display;

/// Findings from checking a document. Only errors fail validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Whether no errors were found.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    fn warn_page(&mut self, page_num: usize, page: &Page, message: impl Display) {
        self.warnings
            .push(format!("Page {} ('{}'): {}", page_num, page.title, message));
    }
}

/// Validate all pages of a document.
pub fn validate_document(document: &Document) -> ValidationResult {
    let mut result = ValidationResult::default();

    if document.pages.is_empty() {
        result.errors.push("Document has no pages".to_string());
    }

    for (idx, page) in document.pages.iter().enumerate() {
        check_page(page, idx + 1, &mut result);
    }
    result
}

/// Validate a single page.
pub fn validate_page(page: &Page, page_num: usize) -> ValidationResult {
    let mut result = ValidationResult::default();
    check_page(page, page_num, &mut result);
    result
}

fn check_page(page: &Page, page_num: usize, result: &mut ValidationResult) {
    if !page.has_content() {
        result.warn_page(page_num, page, "No content");
    }

    if page
        .test_summary
        .as_ref()
        .is_some_and(|summary| summary.awaiting_header())
    {
        result.warn_page(page_num, page, "Test summary has no header");
    }

    // The schema allows each metadata tag at most once per page.
    let mut seen = HashSet::new();
    for field in &page.metadata {
        if !seen.insert(field.tag.as_str()) {
            result.warn_page(
                page_num,
                page,
                format!("Duplicate metadata field <{}>", field.tag),
            );
        }
    }
}
