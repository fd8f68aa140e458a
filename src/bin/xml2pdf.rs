//! xml2pdf - Render page-grouped XML reports as PDF.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use txt2xml_rs::{render_xml_to_pdf, RenderConfig};

/// Generate PDF from XML.
#[derive(Parser, Debug)]
#[command(name = "xml2pdf")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input XML file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output PDF file path
    #[arg(short, long, default_value = "output.pdf")]
    output: PathBuf,

    /// Element name used for generic lines in the XML
    #[arg(short, long, default_value = "line")]
    element: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Processing: {}", args.input.display());

    let xml = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let config = RenderConfig::new(&args.element);
    let pdf = render_xml_to_pdf(&xml, &config)
        .with_context(|| format!("Failed to render {}", args.input.display()))?;

    std::fs::write(&args.output, &pdf)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!("PDF generated as {}", args.output.display());

    Ok(())
}
