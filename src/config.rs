//! Configuration constants and settings for the converter.

use regex::{Regex, RegexBuilder};

/// Line prefixes that are discarded before any classification.
pub const IGNORED_MARKERS: [&str; 2] = ["----", "******"];

/// Case-insensitive prefix that opens a test summary block.
pub const TEST_SUMMARY_TRIGGER: &str = "test summary";

/// Case-insensitive prefix that opens a failure report block.
pub const FAILED_TRIGGER: &str = "failed";

/// Default root element name.
pub const DEFAULT_ROOT_ELEMENT: &str = "document";

/// Default element name for generic lines.
pub const DEFAULT_LINE_ELEMENT: &str = "line";

/// Default special-field table: (pattern, tag). Order sets precedence.
pub const DEFAULT_SPECIAL_FIELDS: [(&str, &str); 3] = [
    (r"^board\s*s/n:?\s*(.*)$", "board_s_n"),
    (r"^date/time:?\s*(.*)$", "date"),
    (r"^technician:?\s*(.*)$", "technician"),
];

/// A4 page width in points.
pub const PAGE_WIDTH_PT: f32 = 595.0;

/// A4 page height in points.
pub const PAGE_HEIGHT_PT: f32 = 842.0;

/// Page margin in points.
pub const PAGE_MARGIN_PT: f32 = 42.0;

/// Vertical advance per rendered line in points.
pub const LINE_HEIGHT_PT: f32 = 16.0;

/// How the page-boundary marker is derived when the first line has no "Page" token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixMode {
    /// Fall back to matching the whole first line exactly.
    #[default]
    Lenient,
    /// Refuse inputs whose first line has no "Page" token.
    Strict,
}

/// One row of the special-field table: a case-insensitive matcher and the tag it emits.
#[derive(Debug, Clone)]
pub struct SpecialField {
    /// Element name written for matches.
    pub tag: String,
    /// Pattern whose first capture group holds the field text.
    pub pattern: Regex,
}

impl SpecialField {
    /// Compile a special field. The pattern is matched case-insensitively.
    pub fn new(pattern: &str, tag: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            tag: tag.into(),
            pattern,
        })
    }

    /// Parse a `TAG=REGEX` specification as given on the command line.
    pub fn from_spec(spec: &str) -> Result<Self, String> {
        let (tag, pattern) = spec
            .split_once('=')
            .ok_or_else(|| format!("expected TAG=REGEX, got '{}'", spec))?;
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(format!("empty tag in '{}'", spec));
        }
        Self::new(pattern, tag).map_err(|e| e.to_string())
    }

    /// Return the trimmed first capture group if `line` matches.
    pub fn extract(&self, line: &str) -> Option<String> {
        let caps = self.pattern.captures(line)?;
        let text = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        Some(text.trim().to_string())
    }

    /// The built-in table: board serial, date/time, technician.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_SPECIAL_FIELDS
            .iter()
            .filter_map(|(pattern, tag)| Self::new(pattern, *tag).ok())
            .collect()
    }
}

/// Settings for plaintext to XML conversion.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Root element name.
    pub root_element: String,
    /// Element name for generic lines.
    pub line_element: String,
    /// Split generic lines into key/value on the first occurrence of this character.
    pub split_char: Option<char>,
    /// Keep blank lines as empty generic elements.
    pub preserve_empty: bool,
    /// Fallback behaviour of prefix inference.
    pub prefix_mode: PrefixMode,
    /// Ordered special-field table; first match wins.
    pub special_fields: Vec<SpecialField>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            root_element: DEFAULT_ROOT_ELEMENT.to_string(),
            line_element: DEFAULT_LINE_ELEMENT.to_string(),
            split_char: None,
            preserve_empty: false,
            prefix_mode: PrefixMode::default(),
            special_fields: SpecialField::defaults(),
        }
    }
}

impl ConvertConfig {
    /// Create a configuration with default element names and field table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the first special field matching `line`.
    ///
    /// Returns the table position, the tag and the captured text.
    pub fn match_special(&self, line: &str) -> Option<(usize, &str, String)> {
        self.special_fields
            .iter()
            .enumerate()
            .find_map(|(slot, field)| {
                field
                    .extract(line)
                    .map(|text| (slot, field.tag.as_str(), text))
            })
    }
}

/// Settings for XML to PDF rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Element name of generic lines in the XML input.
    pub line_element: String,
    /// Font size for page titles.
    pub title_size: f32,
    /// Font size for body text.
    pub body_size: f32,
    /// Font size for the test summary header.
    pub header_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            line_element: DEFAULT_LINE_ELEMENT.to_string(),
            title_size: 14.0,
            body_size: 12.0,
            header_size: 11.0,
        }
    }
}

impl RenderConfig {
    /// Create a render configuration for the given generic element name.
    pub fn new(line_element: impl Into<String>) -> Self {
        Self {
            line_element: line_element.into(),
            ..Default::default()
        }
    }
}

/// Utility functions for case-insensitive prefix checks.
pub mod text {
    /// Characters that end a line. `\r\n` counts as a single break.
    const LINE_BREAKS: [char; 10] = [
        '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
    ];

    /// Split content into lines on every line-break character, not only `\n`.
    ///
    /// A trailing break does not produce a final empty line.
    pub fn split_lines(content: &str) -> Vec<&str> {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut chars = content.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if !LINE_BREAKS.contains(&c) {
                continue;
            }
            lines.push(&content[start..idx]);
            start = idx + c.len_utf8();
            if c == '\r' {
                if let Some(&(next, '\n')) = chars.peek() {
                    chars.next();
                    start = next + 1;
                }
            }
        }

        if start < content.len() {
            lines.push(&content[start..]);
        }
        lines
    }

    /// ASCII case-insensitive `starts_with`.
    #[inline]
    pub fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
        line.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }

    /// Whether the line starts with one of the ignored markers.
    #[inline]
    pub fn is_ignored(line: &str) -> bool {
        super::IGNORED_MARKERS
            .iter()
            .any(|marker| line.starts_with(marker))
    }

    /// Turn a tag into a label: underscores become spaces, words are title-cased.
    pub fn humanize_tag(tag: &str) -> String {
        let mut out = String::with_capacity(tag.len());
        let mut at_word_start = true;
        for c in tag.chars() {
            let c = if c == '_' { ' ' } else { c };
            if c.is_alphabetic() {
                if at_word_start {
                    out.extend(c.to_uppercase());
                } else {
                    out.extend(c.to_lowercase());
                }
                at_word_start = false;
            } else {
                out.push(c);
                at_word_start = true;
            }
        }
        out
    }
}
