//! Plaintext and XML parser module.

mod input;
mod prefix;
mod segmenter;
mod xml;

pub use input::InputSource;
pub use prefix::BoundaryMarker;
pub use segmenter::{segment, Segmenter};
pub use xml::parse_xml;
