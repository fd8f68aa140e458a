//! Error types for report conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for conversion failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Input file not found (-1)
    InputNotFound = -1,
    /// No non-blank lines in input (-2)
    EmptyInput = -2,
    /// Read or write failure (-3)
    IoFailure = -3,
    /// Input is not valid UTF-8 (-4)
    InvalidEncoding = -4,
    /// First line carries no page marker in strict mode (-5)
    NoPageMarker = -5,
    /// Invalid line-classification pattern (-6)
    InvalidPattern = -6,
    /// XML input does not parse (-10)
    MalformedXml = -10,
    /// PDF could not be produced (-20)
    PdfFailure = -20,
}

/// Main error type for the converter.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Empty input: no non-blank lines")]
    EmptyInput,

    #[error("Input is not valid UTF-8: {source_name}")]
    InvalidEncoding { source_name: String },

    #[error("No page marker found in first line '{line}'")]
    NoPageMarker { line: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Malformed XML at byte {position}: {message}")]
    MalformedXml { position: usize, message: String },

    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConvertError::InputNotFound { .. } => ErrorCode::InputNotFound,
            ConvertError::EmptyInput => ErrorCode::EmptyInput,
            ConvertError::InvalidEncoding { .. } => ErrorCode::InvalidEncoding,
            ConvertError::NoPageMarker { .. } => ErrorCode::NoPageMarker,
            ConvertError::InvalidPattern(_) => ErrorCode::InvalidPattern,
            ConvertError::MalformedXml { .. } => ErrorCode::MalformedXml,
            ConvertError::Xml(_) => ErrorCode::IoFailure,
            ConvertError::Pdf(_) => ErrorCode::PdfFailure,
            ConvertError::Io(_) => ErrorCode::IoFailure,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }

    /// Whether this is the empty-input condition, which is reported but not fatal.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, ConvertError::EmptyInput)
    }
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ConvertError::EmptyInput.code_value(), -2);
        assert_eq!(
            ConvertError::InputNotFound {
                path: PathBuf::from("missing.txt")
            }
            .code(),
            ErrorCode::InputNotFound
        );
        assert_eq!(
            ConvertError::MalformedXml {
                position: 3,
                message: "bad".into()
            }
            .code_value(),
            -10
        );
    }

    #[test]
    fn test_is_empty_input() {
        assert!(ConvertError::EmptyInput.is_empty_input());
        assert!(!ConvertError::NoPageMarker {
            line: "x".into()
        }
        .is_empty_input());
    }
}
