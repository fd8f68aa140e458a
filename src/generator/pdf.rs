//! PDF renderer: one A4 page per report page.

use crate::config::text::humanize_tag;
use crate::config::{RenderConfig, LINE_HEIGHT_PT, PAGE_HEIGHT_PT, PAGE_MARGIN_PT, PAGE_WIDTH_PT};
use crate::error::Result;
use crate::model::{Document, Page};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream};
use tracing::{debug, warn};

/// Resource name of the regular font.
const FONT_REGULAR: &str = "F1";

/// Resource name of the bold font.
const FONT_BOLD: &str = "F2";

/// Horizontal offset of metadata values from their labels.
const LABEL_WIDTH_PT: f32 = 85.0;

/// Indent step for nested bullets.
const INDENT_PT: f32 = 14.0;

/// Text cursor for a single PDF page.
pub struct PdfLayout {
    operations: Vec<Operation>,
    y: f32,
    dropped: usize,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfLayout {
    /// Start at the top margin.
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            y: PAGE_HEIGHT_PT - PAGE_MARGIN_PT,
            dropped: 0,
        }
    }

    /// Whether the cursor has passed the bottom margin.
    fn is_full(&self) -> bool {
        self.y < PAGE_MARGIN_PT
    }

    /// Place text at the current baseline without advancing.
    fn place(&mut self, font: &str, size: f32, x: f32, text: &str) {
        if self.is_full() {
            return;
        }
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), Object::Real(size)]),
            Operation::new("Td", vec![Object::Real(x), Object::Real(self.y)]),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Write one line of text and move to the next baseline.
    pub fn line(&mut self, font: &str, size: f32, indent: f32, text: &str) {
        if self.is_full() {
            self.dropped += 1;
        }
        self.place(font, size, PAGE_MARGIN_PT + indent, text);
        self.y -= LINE_HEIGHT_PT;
    }

    /// Write a bold label with a regular value beside it.
    pub fn labeled(&mut self, size: f32, label: &str, value: &str) {
        if self.is_full() {
            self.dropped += 1;
        }
        self.place(FONT_BOLD, size, PAGE_MARGIN_PT, label);
        self.place(FONT_REGULAR, size, PAGE_MARGIN_PT + LABEL_WIDTH_PT, value);
        self.y -= LINE_HEIGHT_PT;
    }

    /// Add vertical space.
    pub fn gap(&mut self, points: f32) {
        self.y -= points;
    }

    /// Number of lines that fell below the bottom margin.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Encode the page content stream.
    pub fn into_content(self) -> Result<Vec<u8>> {
        let content = Content {
            operations: self.operations,
        };
        Ok(content.encode()?)
    }
}

/// Lay out one report page.
fn layout_page(page: &Page, config: &RenderConfig) -> PdfLayout {
    let mut layout = PdfLayout::new();

    layout.line(FONT_BOLD, config.title_size, 0.0, &page.title);
    layout.gap(5.0);

    for field in &page.metadata {
        if field.text.is_empty() {
            continue;
        }
        let label = format!("{}: ", humanize_tag(&field.tag));
        layout.labeled(config.body_size, &label, &field.text);
        layout.gap(2.0);
    }

    if let Some(summary) = &page.test_summary {
        layout.line(FONT_BOLD, config.body_size, 0.0, "Test Summary:");
        let header = summary.header.as_deref().unwrap_or_default();
        layout.line(FONT_BOLD, config.header_size, 0.0, &format!("- {}", header));
        for test in &summary.tests {
            layout.line(FONT_REGULAR, config.body_size, INDENT_PT, &format!("- {}", test));
        }
        layout.gap(3.0);
    }

    if let Some(report) = &page.report {
        layout.line(FONT_BOLD, config.body_size, 0.0, "Report:");
        for line in &report.lines {
            layout.line(FONT_REGULAR, config.body_size, INDENT_PT, &format!("- {}", line));
        }
        layout.gap(3.0);
    }

    for line in &page.lines {
        let text = line.display_text();
        if !text.is_empty() {
            layout.line(FONT_REGULAR, config.body_size, 0.0, text);
        }
    }

    layout
}

fn font_dictionary(base_font: &str) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", "Font".into()),
        ("Subtype", "Type1".into()),
        ("BaseFont", base_font.into()),
        ("Encoding", "WinAnsiEncoding".into()),
    ])
}

/// Render a document as PDF bytes.
///
/// Content that does not fit on its page is dropped with a warning. A
/// document without pages produces a single blank page.
pub fn render_pdf(document: &Document, config: &RenderConfig) -> Result<Vec<u8>> {
    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular_id = pdf.add_object(font_dictionary("Helvetica"));
    let bold_id = pdf.add_object(font_dictionary("Helvetica-Bold"));
    let resources_id = pdf.add_object(Dictionary::from_iter(vec![(
        "Font",
        Dictionary::from_iter(vec![(FONT_REGULAR, regular_id.into()), (FONT_BOLD, bold_id.into())])
            .into(),
    )]));

    let mut layouts: Vec<PdfLayout> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let layout = layout_page(page, config);
        if layout.dropped() > 0 {
            warn!(
                "Page '{}': {} line(s) exceed the page and were dropped",
                page.title,
                layout.dropped()
            );
        }
        layouts.push(layout);
    }
    if layouts.is_empty() {
        warn!("Document has no pages, writing a blank page");
        layouts.push(PdfLayout::new());
    }

    let mut kids: Vec<Object> = Vec::with_capacity(layouts.len());
    for layout in layouts {
        let content_id = pdf.add_object(Stream::new(Dictionary::new(), layout.into_content()?));
        let page_id: ObjectId = pdf.add_object(Dictionary::from_iter(vec![
            ("Type", "Page".into()),
            ("Parent", pages_id.into()),
            ("Contents", content_id.into()),
            ("Resources", resources_id.into()),
            (
                "MediaBox",
                vec![
                    0.into(),
                    0.into(),
                    Object::Real(PAGE_WIDTH_PT),
                    Object::Real(PAGE_HEIGHT_PT),
                ]
                .into(),
            ),
        ]));
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = Dictionary::from_iter(vec![
        ("Type", "Pages".into()),
        ("Kids", kids.into()),
        ("Count", count.into()),
    ]);
    pdf.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = pdf.add_object(Dictionary::from_iter(vec![
        ("Type", "Catalog".into()),
        ("Pages", pages_id.into()),
    ]));
    pdf.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)?;
    debug!("Rendered PDF: {} page(s), {} bytes", count, bytes.len());
    Ok(bytes)
}

/// Map text to WinAnsi bytes; characters outside Latin-1 become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7e | code @ 0xa0..=0xff => code as u8,
            _ => b'?',
        })
        .collect()
}
