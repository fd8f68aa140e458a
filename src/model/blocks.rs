//! Content blocks held by a page.

use serde::{Deserialize, Serialize};

/// A recognized single-line fact such as a serial number or technician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    /// Element name, e.g. `board_s_n`.
    pub tag: String,
    /// Captured text, trimmed.
    pub text: String,
    /// Position of the producing pattern in the special-field table.
    pub slot: usize,
}

impl MetadataField {
    /// Create a metadata field.
    pub fn new(tag: impl Into<String>, text: impl Into<String>, slot: usize) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
            slot,
        }
    }
}

/// Header plus ordered test outcome lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    /// Summary header; `None` until resolved.
    pub header: Option<String>,
    /// Test entries in input order.
    pub tests: Vec<String>,
}

impl TestSummary {
    /// Start a summary, with the inline header if one was given.
    pub fn new(header: Option<String>) -> Self {
        Self {
            header,
            tests: Vec::new(),
        }
    }

    /// Whether the header line is still outstanding.
    pub fn awaiting_header(&self) -> bool {
        self.header.is_none()
    }

    /// Add a collected line: the first one fills a missing header, the rest are tests.
    pub fn push_line(&mut self, line: impl Into<String>) {
        if self.header.is_none() {
            self.header = Some(line.into());
        } else {
            self.tests.push(line.into());
        }
    }
}

/// Lines following a failure trigger, the trigger line first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Report lines in input order.
    pub lines: Vec<String>,
}

impl Report {
    /// Start a report with its trigger line.
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            lines: vec![trigger.into()],
        }
    }

    /// Append a collected line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Any content line not otherwise classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenericLine {
    /// Raw line text.
    Text(String),
    /// Line split on the configured character.
    KeyValue { key: String, value: String },
    /// Preserved blank line.
    Empty,
}

impl GenericLine {
    /// Build a generic line, splitting on the first `split_char` if present.
    pub fn from_line(line: &str, split_char: Option<char>) -> Self {
        if line.is_empty() {
            return GenericLine::Empty;
        }
        match split_char.and_then(|c| line.split_once(c)) {
            Some((key, value)) => GenericLine::KeyValue {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            },
            None => GenericLine::Text(line.to_string()),
        }
    }

    /// Text shown for this line: the value of a key/value pair, else the raw text.
    pub fn display_text(&self) -> &str {
        match self {
            GenericLine::Text(text) => text,
            GenericLine::KeyValue { value, .. } => value,
            GenericLine::Empty => "",
        }
    }
}
