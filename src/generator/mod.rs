//! XML and PDF output generators.

mod pdf;
mod xml;

pub use pdf::{render_pdf, PdfLayout};
pub use xml::generate_xml;
