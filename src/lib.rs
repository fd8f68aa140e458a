//! txt2xml-rs - Convert plaintext test reports to page-grouped XML and PDF.
//!
//! This library segments semi-structured plaintext reports (equipment test
//! logs and the like) into pages, recognizes metadata fields, test summaries
//! and failure reports, and serializes the result as XML. The XML can be read
//! back and rendered into a paginated PDF.
//!
//! # Example
//!
//! ```no_run
//! use txt2xml_rs::{convert_text_to_xml, ConvertConfig};
//!
//! let text = "Unit 12 Page 1\nBoard S/N: ABC123\nTest Summary: All Passed\nVoltage OK\n";
//! let xml = convert_text_to_xml(text, &ConvertConfig::default()).unwrap();
//! println!("{}", xml);
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod validation;

// Re-exports for convenience
pub use config::{ConvertConfig, PrefixMode, RenderConfig, SpecialField};
pub use error::{ConvertError, ErrorCode, Result};
pub use generator::{generate_xml, render_pdf};
pub use model::{Document, GenericLine, MetadataField, Page, Report, TestSummary};
pub use parser::{parse_xml, segment, BoundaryMarker, InputSource, Segmenter};
pub use validation::{validate_document, ValidationResult};

use std::io::Write;
use std::path::Path;

/// Convert plaintext report content to XML.
///
/// Performs the full pipeline:
/// 1. Infer the page marker and segment the lines into pages
/// 2. Serialize the document as XML
///
/// Returns [`ConvertError::EmptyInput`] when the content has no non-blank lines.
pub fn convert_text_to_xml(content: &str, config: &ConvertConfig) -> Result<String> {
    let document = segment(content, config)?;

    tracing::info!(
        "Segmented {} page(s), {} test(s), {} report(s)",
        document.pages.len(),
        document.test_count(),
        document.report_count()
    );

    generate_xml(&document, config)
}

/// Read a plaintext report from a file or stdin and convert it to XML.
pub fn convert_source_to_xml(source: &InputSource, config: &ConvertConfig) -> Result<String> {
    let content = source.read_to_string()?;
    convert_text_to_xml(&content, config)
}

/// Read and segment a report, logging any validation findings.
///
/// Input without a non-blank line is not an error here: a warning is logged
/// and `Ok(None)` returned.
pub fn load_document(source: &InputSource, config: &ConvertConfig) -> Result<Option<Document>> {
    let content = source.read_to_string()?;

    let document = match segment(&content, config) {
        Ok(document) => document,
        Err(ConvertError::EmptyInput) => {
            tracing::warn!("{}: empty input, nothing written", source.name());
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    tracing::info!(
        "Segmented {} page(s), {} test(s), {} report(s)",
        document.pages.len(),
        document.test_count(),
        document.report_count()
    );

    let validation = validate_document(&document);
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }
    for err in &validation.errors {
        tracing::error!("{}", err);
    }

    Ok(Some(document))
}

/// Serialize a document and write it to `output`, or to stdout when `None`.
pub fn write_xml(
    document: &Document,
    output: Option<&Path>,
    config: &ConvertConfig,
) -> Result<()> {
    let xml = generate_xml(document, config)?;

    match output {
        Some(path) => {
            std::fs::write(path, &xml)?;
            tracing::info!("Wrote XML to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(xml.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Convert a report from a file or stdin and write the XML.
///
/// Returns the converted document, or `None` when the input was empty. In
/// that case nothing is written and no output file is created.
pub fn convert_to_output(
    source: &InputSource,
    output: Option<&Path>,
    config: &ConvertConfig,
) -> Result<Option<Document>> {
    let Some(document) = load_document(source, config)? else {
        return Ok(None);
    };
    write_xml(&document, output, config)?;
    Ok(Some(document))
}

/// Render a page-grouped XML document as PDF bytes.
pub fn render_xml_to_pdf(xml: &str, config: &RenderConfig) -> Result<Vec<u8>> {
    let document = parse_xml(xml, &config.line_element)?;
    tracing::info!("Read {} page(s) from XML", document.pages.len());
    render_pdf(&document, config)
}
