//! Document and page containers.

use serde::{Deserialize, Serialize};

use super::blocks::{GenericLine, MetadataField, Report, TestSummary};

/// One page section of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Raw trimmed boundary line.
    pub title: String,
    /// Metadata fields in order of recognition.
    pub metadata: Vec<MetadataField>,
    /// Test summary block, if any.
    pub test_summary: Option<TestSummary>,
    /// Failure report block, if any.
    pub report: Option<Report>,
    /// Unclassified lines.
    pub lines: Vec<GenericLine>,
}

impl Page {
    /// Create an empty page with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Metadata fields ordered by table slot, stable for repeats.
    pub fn metadata_in_table_order(&self) -> Vec<&MetadataField> {
        let mut fields: Vec<_> = self.metadata.iter().collect();
        fields.sort_by_key(|f| f.slot);
        fields
    }

    /// Whether the page holds anything besides its title.
    pub fn has_content(&self) -> bool {
        !self.metadata.is_empty()
            || self.test_summary.is_some()
            || self.report.is_some()
            || !self.lines.is_empty()
    }
}

/// Root container: pages in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Pages in input order.
    pub pages: Vec<Page>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of test entries across all pages.
    pub fn test_count(&self) -> usize {
        self.pages
            .iter()
            .filter_map(|p| p.test_summary.as_ref())
            .map(|s| s.tests.len())
            .sum()
    }

    /// Number of pages carrying a failure report.
    pub fn report_count(&self) -> usize {
        self.pages.iter().filter(|p| p.report.is_some()).count()
    }
}
