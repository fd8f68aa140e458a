//! Reader for page-grouped XML documents.

use crate::error::{ConvertError, Result};
use crate::model::{Document, GenericLine, MetadataField, Page, Report, TestSummary};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Title used when a page carries no `<title>`.
const DEFAULT_PAGE_TITLE: &str = "Page";

/// Incremental builder driven by start/text/end events.
struct DocumentBuilder<'a> {
    line_element: &'a str,
    /// Open element names, root first.
    stack: Vec<String>,
    text: String,
    document: Document,
    page: Option<Page>,
    summary: Option<TestSummary>,
    report: Option<Report>,
    key: Option<String>,
    value: Option<String>,
}

impl<'a> DocumentBuilder<'a> {
    fn new(line_element: &'a str) -> Self {
        Self {
            line_element,
            stack: Vec::new(),
            text: String::new(),
            document: Document::new(),
            page: None,
            summary: None,
            report: None,
            key: None,
            value: None,
        }
    }

    /// Element names below the root.
    fn path(&self) -> Vec<String> {
        self.stack.iter().skip(1).cloned().collect()
    }

    fn open(&mut self, name: String) {
        self.text.clear();
        self.stack.push(name);

        let path = self.path();
        let path: Vec<&str> = path.iter().map(String::as_str).collect();
        match path.as_slice() {
            ["page"] => self.page = Some(Page::new("")),
            ["page", "test_summary"] => self.summary = Some(TestSummary::new(None)),
            ["page", "report"] => self.report = Some(Report::default()),
            ["page", generic] if *generic == self.line_element => {
                self.key = None;
                self.value = None;
            }
            _ => {}
        }
    }

    fn close(&mut self) {
        let text = std::mem::take(&mut self.text);
        let line_element = self.line_element;
        let path = self.path();
        let path: Vec<&str> = path.iter().map(String::as_str).collect();

        match path.as_slice() {
            ["page"] => {
                if let Some(mut page) = self.page.take() {
                    if page.title.is_empty() {
                        page.title = DEFAULT_PAGE_TITLE.to_string();
                    }
                    self.document.pages.push(page);
                }
            }
            ["page", "title"] => {
                if let Some(page) = self.page.as_mut() {
                    page.title = text;
                }
            }
            ["page", "test_summary", "header"] => {
                if let Some(summary) = self.summary.as_mut() {
                    if summary.header.is_none() {
                        summary.header = Some(text);
                    }
                }
            }
            ["page", "test_summary", "test"] => {
                if let Some(summary) = self.summary.as_mut() {
                    summary.tests.push(text);
                }
            }
            ["page", "test_summary"] => {
                if let (Some(page), Some(summary)) = (self.page.as_mut(), self.summary.take()) {
                    if page.test_summary.is_none() {
                        page.test_summary = Some(summary);
                    }
                }
            }
            ["page", "report", "line"] => {
                if let Some(report) = self.report.as_mut() {
                    report.push_line(text);
                }
            }
            ["page", "report"] => {
                if let (Some(page), Some(report)) = (self.page.as_mut(), self.report.take()) {
                    if page.report.is_none() {
                        page.report = Some(report);
                    }
                }
            }
            ["page", generic, "key"] if *generic == line_element => self.key = Some(text),
            ["page", generic, "value"] if *generic == line_element => self.value = Some(text),
            ["page", generic] if *generic == line_element => {
                let line = match (self.key.take(), self.value.take()) {
                    (None, None) if text.is_empty() => GenericLine::Empty,
                    (None, None) => GenericLine::Text(text),
                    (key, value) => GenericLine::KeyValue {
                        key: key.unwrap_or_default(),
                        value: value.unwrap_or_default(),
                    },
                };
                if let Some(page) = self.page.as_mut() {
                    page.lines.push(line);
                }
            }
            ["page", tag] => {
                if let Some(page) = self.page.as_mut() {
                    let slot = page.metadata.len();
                    page.metadata.push(MetadataField::new(*tag, text, slot));
                }
            }
            _ => {}
        }

        self.stack.pop();
    }
}

fn malformed(reader: &Reader<&[u8]>, message: impl Into<String>) -> ConvertError {
    ConvertError::MalformedXml {
        position: reader.buffer_position(),
        message: message.into(),
    }
}

/// Parse a page-grouped XML document.
///
/// Direct children of `<page>` other than `title`, `test_summary`, `report`
/// and the generic element are read as metadata fields.
pub fn parse_xml(xml: &str, line_element: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut builder = DocumentBuilder::new(line_element);
    let mut seen_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if builder.stack.is_empty() && seen_root {
                    return Err(malformed(&reader, "multiple root elements"));
                }
                seen_root = true;
                builder.open(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::Empty(e)) => {
                if builder.stack.is_empty() && seen_root {
                    return Err(malformed(&reader, "multiple root elements"));
                }
                seen_root = true;
                builder.open(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                builder.close();
            }
            Ok(Event::Text(e)) => {
                if builder.stack.is_empty() {
                    return Err(malformed(&reader, "text outside root element"));
                }
                let text = e
                    .unescape()
                    .map_err(|err| malformed(&reader, err.to_string()))?;
                builder.text.push_str(&text);
            }
            Ok(Event::CData(e)) => {
                builder.text.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::End(_)) => builder.close(),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(malformed(&reader, err.to_string())),
        }
    }

    if !seen_root {
        return Err(malformed(&reader, "no root element"));
    }
    if !builder.stack.is_empty() {
        return Err(malformed(
            &reader,
            format!("unclosed element <{}>", builder.stack.join("><")),
        ));
    }

    Ok(builder.document)
}
