//! Page-boundary marker inference.

use crate::config::PrefixMode;
use crate::error::{ConvertError, Result};
use regex::Regex;

/// Everything up to and including the last word "Page", anchored at line start.
const PAGE_PREFIX_PATTERN: &str = r"(?i)^(.*Page)\b";

/// The literal that signals a new page section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryMarker {
    /// Lines starting with this text open a page.
    Prefix(String),
    /// Only lines equal to this text open a page.
    ExactLine(String),
}

impl BoundaryMarker {
    /// Infer the marker from the first non-blank line.
    ///
    /// Without a "Page" token the whole trimmed line becomes the marker in
    /// lenient mode, so only identical lines start new pages. Strict mode
    /// rejects such input instead.
    pub fn infer(first_line: &str, mode: PrefixMode) -> Result<Self> {
        let first_line = first_line.trim();
        let pattern = Regex::new(PAGE_PREFIX_PATTERN)?;

        if let Some(prefix) = pattern.captures(first_line).and_then(|c| c.get(1)) {
            return Ok(BoundaryMarker::Prefix(prefix.as_str().to_string()));
        }

        match mode {
            PrefixMode::Lenient => Ok(BoundaryMarker::ExactLine(first_line.to_string())),
            PrefixMode::Strict => Err(ConvertError::NoPageMarker {
                line: first_line.to_string(),
            }),
        }
    }

    /// Whether a trimmed line opens a new page.
    pub fn matches(&self, line: &str) -> bool {
        match self {
            BoundaryMarker::Prefix(prefix) => line.starts_with(prefix.as_str()),
            BoundaryMarker::ExactLine(text) => line == text,
        }
    }

    /// The marker text.
    pub fn as_str(&self) -> &str {
        match self {
            BoundaryMarker::Prefix(text) | BoundaryMarker::ExactLine(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(line: &str) -> BoundaryMarker {
        BoundaryMarker::infer(line, PrefixMode::Lenient).unwrap()
    }

    #[test]
    fn test_infer_prefix() {
        let marker = infer("Unit 12 Page 1");
        assert_eq!(marker, BoundaryMarker::Prefix("Unit 12 Page".into()));
        assert!(marker.matches("Unit 12 Page 2 of 5"));
        assert!(!marker.matches("Unit 13 Page 2"));
        assert!(!marker.matches("Voltage OK"));
    }

    #[test]
    fn test_infer_prefix_case_insensitive_search() {
        let marker = infer("SYSTEM TEST PAGE 1");
        assert_eq!(marker.as_str(), "SYSTEM TEST PAGE");
        assert!(marker.matches("SYSTEM TEST PAGE 2"));
    }

    #[test]
    fn test_infer_prefix_last_page_word() {
        let marker = infer("Page Setup Page 3");
        assert_eq!(marker.as_str(), "Page Setup Page");
    }

    #[test]
    fn test_infer_requires_word_boundary() {
        let marker = infer("Pages of Unit 7");
        assert_eq!(marker, BoundaryMarker::ExactLine("Pages of Unit 7".into()));
    }

    #[test]
    fn test_fallback_exact_line() {
        let marker = infer("  Report Header  ");
        assert_eq!(marker, BoundaryMarker::ExactLine("Report Header".into()));
        assert!(marker.matches("Report Header"));
        assert!(!marker.matches("Report Header 2"));
        assert!(!marker.matches("Report"));
    }

    #[test]
    fn test_strict_mode_rejects_missing_page() {
        let err = BoundaryMarker::infer("Report Header", PrefixMode::Strict).unwrap_err();
        assert!(matches!(err, ConvertError::NoPageMarker { .. }));

        let marker = BoundaryMarker::infer("Unit Page 1", PrefixMode::Strict).unwrap();
        assert_eq!(marker.as_str(), "Unit Page");
    }
}
