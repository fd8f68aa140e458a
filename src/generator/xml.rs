//! XML serializer for segmented documents.

use crate::config::ConvertConfig;
use crate::error::{ConvertError, Result};
use crate::model::{Document, GenericLine, Page};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Serialize a document to indented XML.
///
/// Page children are written in a fixed order: title, metadata fields in
/// table order, test summary, report, generic lines.
pub fn generate_xml(document: &Document, config: &ConvertConfig) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let root = config.root_element.as_str();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    if document.pages.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(root)))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(root)))?;
        for page in &document.pages {
            write_page(&mut writer, page, config)?;
        }
        writer.write_event(Event::End(BytesEnd::new(root)))?;
    }

    let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| {
        ConvertError::InvalidEncoding {
            source_name: format!("generated XML ({})", e),
        }
    })?;
    xml.push('\n');
    Ok(xml)
}

fn write_page<W: Write>(writer: &mut Writer<W>, page: &Page, config: &ConvertConfig) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("page")))?;
    write_text_element(writer, "title", &page.title)?;

    for field in page.metadata_in_table_order() {
        write_text_element(writer, &field.tag, &field.text)?;
    }

    if let Some(summary) = &page.test_summary {
        writer.write_event(Event::Start(BytesStart::new("test_summary")))?;
        if let Some(header) = &summary.header {
            write_text_element(writer, "header", header)?;
        }
        for test in &summary.tests {
            write_text_element(writer, "test", test)?;
        }
        writer.write_event(Event::End(BytesEnd::new("test_summary")))?;
    }

    if let Some(report) = &page.report {
        writer.write_event(Event::Start(BytesStart::new("report")))?;
        for line in &report.lines {
            write_text_element(writer, "line", line)?;
        }
        writer.write_event(Event::End(BytesEnd::new("report")))?;
    }

    let element = config.line_element.as_str();
    for line in &page.lines {
        match line {
            GenericLine::Text(text) => write_text_element(writer, element, text)?,
            GenericLine::KeyValue { key, value } => {
                writer.write_event(Event::Start(BytesStart::new(element)))?;
                write_text_element(writer, "key", key)?;
                write_text_element(writer, "value", value)?;
                writer.write_event(Event::End(BytesEnd::new(element)))?;
            }
            GenericLine::Empty => writer.write_event(Event::Empty(BytesStart::new(element)))?,
        }
    }

    writer.write_event(Event::End(BytesEnd::new("page")))?;
    Ok(())
}

/// Write `<tag>text</tag>`, or `<tag/>` for empty text.
fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(tag)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
