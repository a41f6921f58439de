//! pdftotext - Convert PDF documents (and single images) to plain text.
//!
//! Extracts a document's embedded text layer when one is present and
//! falls back to rasterizing the pages and running OCR when it is not.
//! Output goes to a file or to stdout, optionally filtered line-by-line.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use pdftotext_core::pipeline::{ConvertOptions, Outcome, Pipeline};
use tracing_subscriber::EnvFilter;

/// Convert a PDF document (or single image) to plain text, using OCR
/// when no text layer is present.
#[derive(Parser, Debug)]
#[command(name = "pdftotext")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the input PDF or image file
    input_pdf: PathBuf,

    // === Output options ===
    /// Path to the output text file; stdout if omitted
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Only output lines containing this word (case-insensitive)
    #[arg(short = 'f', long)]
    filter: Option<String>,

    // === OCR options ===
    /// OCR recognition language
    #[arg(short = 'l', long, default_value = "eng")]
    lang: String,

    /// External raster converter program (default: probed magick or
    /// convert, overridable with PDFTOTEXT_CONVERTER)
    #[arg(long)]
    converter: Option<String>,

    /// Rasterization density in DPI
    #[arg(long, default_value = "300")]
    dpi: u32,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

/// Install the stderr subscriber. RUST_LOG takes precedence; the
/// default level is lifted to debug by `-d`.
fn init_tracing(debug: bool) {
    let default_directive = if debug { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.debug);
    tracing::debug!(?args, "parsed arguments");

    let options = ConvertOptions {
        output: args.output,
        filter: args.filter,
        language: args.lang,
        dpi: args.dpi,
        converter: args.converter,
    };

    let pipeline = Pipeline::new(options);
    match pipeline.run(&args.input_pdf) {
        Ok(Outcome::Failed) => std::process::exit(1),
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
