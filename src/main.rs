//! txt2xml - CLI tool to convert plaintext reports to page-grouped XML.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use txt2xml_rs::{
    convert_to_output, load_document, validate_document, ConvertConfig, InputSource, PrefixMode,
    SpecialField,
};

/// Convert plaintext to XML, grouped by Page sections.
#[derive(Parser, Debug)]
#[command(name = "txt2xml")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file path or '-' for stdin
    #[arg(short, long)]
    input: String,

    /// Output XML file path. If omitted, prints to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Root element name
    #[arg(short, long, default_value = "document")]
    root: String,

    /// Element name for generic lines
    #[arg(short, long, default_value = "line")]
    element: String,

    /// Split each generic line on the first occurrence of this char into <key>/<value>
    #[arg(short, long)]
    split_char: Option<char>,

    /// Preserve empty lines as elements
    #[arg(long)]
    preserve_empty: bool,

    /// Fail instead of matching the whole first line when it has no "Page" token
    #[arg(long)]
    strict_prefix: bool,

    /// Extra special field as TAG=REGEX (first capture group is the text); repeatable
    #[arg(long = "field", value_name = "TAG=REGEX", value_parser = SpecialField::from_spec)]
    fields: Vec<SpecialField>,

    /// Validate only, don't generate output
    #[arg(long)]
    validate: bool,

    /// Output the segmented document as JSON instead of XML
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn convert_config(&self) -> ConvertConfig {
        let mut config = ConvertConfig {
            root_element: self.root.clone(),
            line_element: self.element.clone(),
            split_char: self.split_char,
            preserve_empty: self.preserve_empty,
            prefix_mode: if self.strict_prefix {
                PrefixMode::Strict
            } else {
                PrefixMode::Lenient
            },
            ..Default::default()
        };
        config.special_fields.extend(self.fields.iter().cloned());
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for XML output
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

    let source = InputSource::from_arg(&args.input);
    let config = args.convert_config();

    info!("Processing: {}", source.name());

    if !(args.validate || args.debug) {
        convert_to_output(&source, args.output.as_deref(), &config)
            .with_context(|| format!("Failed to convert {}", source.name()))?;
        return Ok(());
    }

    let Some(document) = load_document(&source, &config)
        .with_context(|| format!("Failed to read {}", source.name()))?
    else {
        return Ok(());
    };

    // Validate-only mode
    if args.validate {
        if !validate_document(&document).passed() {
            anyhow::bail!("Validation failed");
        }
        info!("Validation passed");
        return Ok(());
    }

    // Debug output
    let json = serde_json::to_string_pretty(&document)?;
    println!("{}", json);

    Ok(())
}
