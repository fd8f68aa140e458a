//! Single-pass line classifier that groups plaintext reports into pages.

use crate::config::text::{is_ignored, split_lines, starts_with_ignore_case};
use crate::config::{ConvertConfig, FAILED_TRIGGER, TEST_SUMMARY_TRIGGER};
use crate::error::{ConvertError, Result};
use crate::model::{Document, GenericLine, MetadataField, Page, Report, TestSummary};
use tracing::{debug, warn};

use super::prefix::BoundaryMarker;

/// Collection mode of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    InTestSummary,
    InReport,
}

/// Plaintext report segmenter.
pub struct Segmenter<'a> {
    /// Input lines with leading blank lines removed.
    lines: Vec<&'a str>,
    config: &'a ConvertConfig,
}

impl<'a> Segmenter<'a> {
    /// Create a segmenter over the given content.
    pub fn new(content: &'a str, config: &'a ConvertConfig) -> Self {
        let lines: Vec<&str> = split_lines(content)
            .into_iter()
            .skip_while(|line| line.trim().is_empty())
            .collect();
        Self { lines, config }
    }

    /// Infer the page-boundary marker from the first non-blank line.
    pub fn boundary_marker(&self) -> Result<BoundaryMarker> {
        let first = self.lines.first().ok_or(ConvertError::EmptyInput)?;
        BoundaryMarker::infer(first, self.config.prefix_mode)
    }

    /// Classify every line and build the page tree.
    pub fn segment(&self) -> Result<Document> {
        let marker = self.boundary_marker()?;
        debug!("Page boundary marker: {:?}", marker);

        let mut document = Document::new();
        let mut current: Option<Page> = None;
        let mut mode = Mode::Normal;
        // Set while collecting a repeated block; the page keeps its first one.
        let mut detached = false;

        for (idx, raw) in self.lines.iter().enumerate() {
            let line = raw.trim();

            if line.is_empty() {
                if self.config.preserve_empty {
                    if let Some(page) = current.as_mut() {
                        page.lines.push(GenericLine::Empty);
                    }
                }
                continue;
            }

            if is_ignored(line) {
                continue;
            }

            if marker.matches(line) {
                if let Some(page) = current.take() {
                    document.pages.push(page);
                }
                current = Some(Page::new(line));
                mode = Mode::Normal;
                detached = false;
                continue;
            }

            // Content before any boundary: open a page titled by this line and keep classifying it.
            let page = current.get_or_insert_with(|| {
                warn!(
                    "Line {}: content before first page marker, opening implicit page",
                    idx + 1
                );
                Page::new(line)
            });

            if starts_with_ignore_case(line, TEST_SUMMARY_TRIGGER) {
                let header = line[TEST_SUMMARY_TRIGGER.len()..]
                    .trim_start_matches(|c: char| c == ':' || c == ' ')
                    .trim();
                detached = page.test_summary.is_some();
                if detached {
                    warn!(
                        "Line {}: second test summary on page '{}' ignored",
                        idx + 1,
                        page.title
                    );
                } else {
                    let header = (!header.is_empty()).then(|| header.to_string());
                    page.test_summary = Some(TestSummary::new(header));
                }
                mode = Mode::InTestSummary;
                continue;
            }

            if mode == Mode::InTestSummary {
                if let Some(summary) = page.test_summary.as_mut().filter(|_| !detached) {
                    summary.push_line(line);
                }
                continue;
            }

            if starts_with_ignore_case(line, FAILED_TRIGGER) {
                detached = page.report.is_some();
                if detached {
                    warn!(
                        "Line {}: second report on page '{}' ignored",
                        idx + 1,
                        page.title
                    );
                } else {
                    page.report = Some(Report::new(line));
                }
                mode = Mode::InReport;
                continue;
            }

            if mode == Mode::InReport {
                if let Some(report) = page.report.as_mut().filter(|_| !detached) {
                    report.push_line(line);
                }
                continue;
            }

            if let Some((slot, tag, text)) = self.config.match_special(line) {
                page.metadata.push(MetadataField::new(tag, text, slot));
                continue;
            }

            page.lines
                .push(GenericLine::from_line(line, self.config.split_char));
        }

        if let Some(page) = current {
            document.pages.push(page);
        }

        debug!("Segmented {} page(s)", document.pages.len());
        Ok(document)
    }
}

/// Segment plaintext content into a page-grouped document.
pub fn segment(content: &str, config: &ConvertConfig) -> Result<Document> {
    Segmenter::new(content, config).segment()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrefixMode;
    use pretty_assertions::assert_eq;

    fn run(content: &str) -> Document {
        segment(content, &ConvertConfig::default()).unwrap()
    }

    // ==================== Page boundary tests ====================

    #[test]
    fn test_pages_by_inferred_prefix() {
        let doc = run("Unit 12 Page 1\nalpha\nUnit 12 Page 2 of 5\nbeta\n");
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].title, "Unit 12 Page 1");
        assert_eq!(doc.pages[1].title, "Unit 12 Page 2 of 5");
        assert_eq!(doc.pages[1].lines, vec![GenericLine::Text("beta".into())]);
    }

    #[test]
    fn test_non_matching_lines_stay_on_page() {
        let doc = run("Unit 12 Page 1\nUnit 13 Page 2\nunit 12 page 3\n");
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].lines.len(), 2);
    }

    #[test]
    fn test_fallback_prefix_exact_line() {
        let doc = run("Report Header\nfirst\nReport Header 2\nReport Header\nsecond\n");
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(
            doc.pages[0].lines,
            vec![
                GenericLine::Text("first".into()),
                GenericLine::Text("Report Header 2".into())
            ]
        );
        assert_eq!(doc.pages[1].title, "Report Header");
    }

    #[test]
    fn test_leading_blank_lines_and_indentation() {
        let doc = run("\n   \n  Unit Page 1  \n   indented line   \n");
        assert_eq!(doc.pages[0].title, "Unit Page 1");
        assert_eq!(doc.pages[0].lines, vec![GenericLine::Text("indented line".into())]);
    }

    #[test]
    fn test_implicit_page_when_first_line_ignored() {
        // The marker is taken from the ignored banner, so no line ever matches it.
        let doc = run("--------\nBoard S/N: X1\nplain\n");
        assert_eq!(doc.pages.len(), 1);
        let page = &doc.pages[0];
        assert_eq!(page.title, "Board S/N: X1");
        assert_eq!(page.metadata, vec![MetadataField::new("board_s_n", "X1", 0)]);
        assert_eq!(page.lines, vec![GenericLine::Text("plain".into())]);
    }

    #[test]
    fn test_empty_input() {
        let err = segment("\n  \n\t\n", &ConvertConfig::default()).unwrap_err();
        assert!(err.is_empty_input());
        assert!(segment("", &ConvertConfig::default())
            .unwrap_err()
            .is_empty_input());
    }

    #[test]
    fn test_strict_prefix_mode() {
        let config = ConvertConfig {
            prefix_mode: PrefixMode::Strict,
            ..Default::default()
        };
        let err = segment("Report Header\nline\n", &config).unwrap_err();
        assert!(matches!(err, ConvertError::NoPageMarker { .. }));
    }

    #[test]
    fn test_pages_with_carriage_return_line_endings() {
        let doc = run("Unit Page 1\rBoard S/N: A1\rUnit Page 2\rplain\r");
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].title, "Unit Page 1");
        assert_eq!(doc.pages[0].metadata, vec![MetadataField::new("board_s_n", "A1", 0)]);
        assert_eq!(doc.pages[1].title, "Unit Page 2");
        assert_eq!(doc.pages[1].lines, vec![GenericLine::Text("plain".into())]);
    }

    #[test]
    fn test_pages_with_mixed_line_endings() {
        let doc = run("Unit Page 1\r\nTest Summary: H\rT1\x0cUnit Page 2\u{2028}plain\n");
        assert_eq!(doc.pages.len(), 2);
        let summary = doc.pages[0].test_summary.as_ref().unwrap();
        assert_eq!(summary.header.as_deref(), Some("H"));
        assert_eq!(summary.tests, vec!["T1"]);
        assert_eq!(doc.pages[1].lines, vec![GenericLine::Text("plain".into())]);
    }

    // ==================== Metadata tests ====================

    #[test]
    fn test_metadata_extraction() {
        let doc = run("Unit Page 1\nBoard S/N: ABC123\nDate/Time: 2024-01-15 10:00\nTechnician: J. Doe\n");
        assert_eq!(
            doc.pages[0].metadata,
            vec![
                MetadataField::new("board_s_n", "ABC123", 0),
                MetadataField::new("date", "2024-01-15 10:00", 1),
                MetadataField::new("technician", "J. Doe", 2),
            ]
        );
        assert!(doc.pages[0].lines.is_empty());
    }

    #[test]
    fn test_metadata_without_colon() {
        let doc = run("Unit Page 1\nboardS/N   Z-9\n");
        assert_eq!(doc.pages[0].metadata[0].text, "Z-9");
    }

    // ==================== Test summary tests ====================

    #[test]
    fn test_summary_inline_header() {
        let doc = run("Unit Page 1\nTest Summary: All Passed\nVoltage OK\nCurrent OK\n");
        let summary = doc.pages[0].test_summary.as_ref().unwrap();
        assert_eq!(summary.header.as_deref(), Some("All Passed"));
        assert_eq!(summary.tests, vec!["Voltage OK", "Current OK"]);
    }

    #[test]
    fn test_summary_header_from_next_line() {
        let doc = run("Unit Page 1\nTest Summary\nVoltage OK\n");
        let summary = doc.pages[0].test_summary.as_ref().unwrap();
        assert_eq!(summary.header.as_deref(), Some("Voltage OK"));
        assert!(summary.tests.is_empty());
    }

    #[test]
    fn test_summary_header_strip_colon_and_spaces() {
        let doc = run("Unit Page 1\nTEST SUMMARY :: Result \n");
        let summary = doc.pages[0].test_summary.as_ref().unwrap();
        assert_eq!(summary.header.as_deref(), Some("Result"));
    }

    #[test]
    fn test_summary_absorbs_special_and_failed_lines() {
        let doc = run("Unit Page 1\nTest Summary: H\nTechnician: Ann\nFailed step 2\n");
        let page = &doc.pages[0];
        let summary = page.test_summary.as_ref().unwrap();
        assert_eq!(summary.tests, vec!["Technician: Ann", "Failed step 2"]);
        assert!(page.metadata.is_empty());
        assert!(page.report.is_none());
    }

    #[test]
    fn test_summary_header_awaits_across_page_without_leak() {
        let doc = run("Unit Page 1\nTest Summary\nUnit Page 2\nplain\n");
        assert!(doc.pages[0].test_summary.as_ref().unwrap().awaiting_header());
        assert!(doc.pages[1].test_summary.is_none());
        assert_eq!(doc.pages[1].lines, vec![GenericLine::Text("plain".into())]);
    }

    #[test]
    fn test_second_summary_keeps_first() {
        let doc = run("Unit Page 1\nTest Summary: A\nT1\nTest Summary: B\nT2\nfailed x\n");
        let page = &doc.pages[0];
        let summary = page.test_summary.as_ref().unwrap();
        assert_eq!(summary.header.as_deref(), Some("A"));
        assert_eq!(summary.tests, vec!["T1"]);
        assert!(page.report.is_none());
        assert!(page.lines.is_empty());
    }

    #[test]
    fn test_second_summary_on_next_page_is_collected() {
        let doc = run("Unit Page 1\nTest Summary: A\nTest Summary: B\nUnit Page 2\nTest Summary: C\nT3\n");
        assert!(doc.pages[0].test_summary.as_ref().unwrap().tests.is_empty());
        let summary = doc.pages[1].test_summary.as_ref().unwrap();
        assert_eq!(summary.header.as_deref(), Some("C"));
        assert_eq!(summary.tests, vec!["T3"]);
    }

    // ==================== Report tests ====================

    #[test]
    fn test_report_collection_boundary() {
        let doc = run("Unit Page 1\nFAILED: overcurrent\ncheck fuse\nreplace board\nUnit Page 2\nafter\n");
        assert_eq!(doc.pages.len(), 2);
        let report = doc.pages[0].report.as_ref().unwrap();
        assert_eq!(
            report.lines,
            vec!["FAILED: overcurrent", "check fuse", "replace board"]
        );
        assert!(doc.pages[1].report.is_none());
        assert_eq!(doc.pages[1].lines, vec![GenericLine::Text("after".into())]);
    }

    #[test]
    fn test_test_summary_interrupts_report() {
        let doc = run("Unit Page 1\nfailed once\nnote\nTest Summary: Retest\nVoltage OK\n");
        let page = &doc.pages[0];
        assert_eq!(page.report.as_ref().unwrap().lines, vec!["failed once", "note"]);
        assert_eq!(page.test_summary.as_ref().unwrap().tests, vec!["Voltage OK"]);
    }

    #[test]
    fn test_report_absorbs_metadata_lines() {
        let doc = run("Unit Page 1\nfailed\nBoard S/N: 7\n");
        let page = &doc.pages[0];
        assert_eq!(page.report.as_ref().unwrap().lines, vec!["failed", "Board S/N: 7"]);
        assert!(page.metadata.is_empty());
    }

    #[test]
    fn test_second_report_keeps_first() {
        let doc = run("Unit Page 1\nfailed one\nr1\nFAILED two\nr2\nUnit Page 2\nplain\n");
        assert_eq!(doc.pages[0].report.as_ref().unwrap().lines, vec!["failed one", "r1"]);
        assert!(doc.pages[0].lines.is_empty());
        assert_eq!(doc.pages[1].lines, vec![GenericLine::Text("plain".into())]);
    }

    #[test]
    fn test_summary_after_second_report_is_collected() {
        let doc = run("Unit Page 1\nfailed one\nfailed two\nr2\nTest Summary: S\nT1\n");
        let page = &doc.pages[0];
        assert_eq!(page.report.as_ref().unwrap().lines, vec!["failed one"]);
        assert_eq!(page.test_summary.as_ref().unwrap().tests, vec!["T1"]);
    }

    // ==================== Ignored and empty line tests ====================

    #[test]
    fn test_ignored_markers_inside_blocks() {
        let doc = run("Unit Page 1\nTest Summary\n------\nHeader Line\n******\nT1\nfailed x\n");
        let summary = doc.pages[0].test_summary.as_ref().unwrap();
        assert_eq!(summary.header.as_deref(), Some("Header Line"));
        assert_eq!(summary.tests, vec!["T1", "failed x"]);
    }

    #[test]
    fn test_blank_lines_dropped_by_default() {
        let doc = run("Unit Page 1\n\nTest Summary\n\nHeader\n");
        assert!(doc.pages[0].lines.is_empty());
        assert_eq!(
            doc.pages[0].test_summary.as_ref().unwrap().header.as_deref(),
            Some("Header")
        );
    }

    #[test]
    fn test_preserve_empty_keeps_mode() {
        let config = ConvertConfig {
            preserve_empty: true,
            ..Default::default()
        };
        let doc = segment("Unit Page 1\nTest Summary\n\nHeader\nT1\n", &config).unwrap();
        let page = &doc.pages[0];
        assert_eq!(page.lines, vec![GenericLine::Empty]);
        let summary = page.test_summary.as_ref().unwrap();
        assert_eq!(summary.header.as_deref(), Some("Header"));
        assert_eq!(summary.tests, vec!["T1"]);
    }

    // ==================== Generic line tests ====================

    #[test]
    fn test_key_value_split() {
        let config = ConvertConfig {
            split_char: Some(':'),
            ..Default::default()
        };
        let doc = segment("Unit Page 1\nVoltage: 5V\nno split here\n", &config).unwrap();
        assert_eq!(
            doc.pages[0].lines,
            vec![
                GenericLine::KeyValue {
                    key: "Voltage".into(),
                    value: "5V".into()
                },
                GenericLine::Text("no split here".into()),
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        let content = "Unit Page 1\nTest Summary: A\nB\nUnit Page 2\nfailed\nC\n";
        assert_eq!(run(content), run(content));
    }
}
