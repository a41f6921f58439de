//! The conversion pipeline.
//!
//! Tries a document's embedded text layer first; when that yields
//! nothing usable, falls back to rasterizing the document and running
//! OCR over the page images. Exactly one of the two paths produces the
//! run's text.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::image_pdf::write_image_pdf;
use crate::ocr::{OcrEngine, TesseractEngine, recognize_pages};
use crate::output::write_output;
use crate::raster::{MagickRasterizer, PageRasterizer, locate_converter};
use crate::text_layer::extract_text_layer;

/// Options for a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Destination text file. None writes to stdout.
    pub output: Option<PathBuf>,

    /// Case-insensitive substring; only matching lines are kept.
    pub filter: Option<String>,

    /// OCR recognition language.
    pub language: String,

    /// Rasterization density in DPI.
    pub dpi: u32,

    /// External converter program. None resolves via the locator
    /// (environment variable, then probed default).
    pub converter: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output: None,
            filter: None,
            language: "eng".to_string(),
            dpi: 300,
            converter: None,
        }
    }
}

/// Terminal outcome of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The embedded text layer produced the output.
    TextLayer,
    /// The OCR fallback produced the output.
    Ocr,
    /// Neither path produced text; nothing was written.
    Failed,
}

/// The conversion pipeline.
///
/// Owns the run's collaborators: a [`PageRasterizer`] for the OCR
/// fallback's page images and an [`OcrEngine`] for recognition. Use
/// [`Pipeline::new`] for the stock subprocess-and-Tesseract setup, or
/// [`PipelineBuilder`] to substitute either collaborator.
pub struct Pipeline {
    options: ConvertOptions,
    rasterizer: Box<dyn PageRasterizer>,
    engine: Box<dyn OcrEngine>,
}

impl Pipeline {
    /// Creates a pipeline with the stock rasterizer and OCR engine.
    pub fn new(options: ConvertOptions) -> Self {
        PipelineBuilder::with_options(options).build()
    }

    /// Runs the conversion on `input` and writes the result per the
    /// configured options.
    ///
    /// Status messages go to stderr. Returns the terminal outcome;
    /// [`Outcome::Failed`] means both paths failed and nothing was
    /// written.
    ///
    /// # Errors
    /// `ConvertError::Write` when text was produced but the
    /// destination file could not be written. Extraction,
    /// rasterization and OCR failures are reported on stderr and fold
    /// into the returned outcome instead.
    ///
    /// # Example
    /// ```ignore
    /// use pdftotext_core::pipeline::{ConvertOptions, Outcome, Pipeline};
    ///
    /// let pipeline = Pipeline::new(ConvertOptions::default());
    /// match pipeline.run("scan.pdf".as_ref())? {
    ///     Outcome::Failed => std::process::exit(1),
    ///     _ => {}
    /// }
    /// ```
    pub fn run(&self, input: &Path) -> Result<Outcome> {
        if let Some(text) = self.try_text_layer(input) {
            eprintln!("PDF contains extractable text.");
            self.write(&text)?;
            return Ok(Outcome::TextLayer);
        }

        eprintln!("PDF does not contain extractable text. Attempting OCR...");
        match self.try_ocr(input) {
            Some(text) => {
                eprintln!("OCR completed successfully.");
                self.write(&text)?;
                Ok(Outcome::Ocr)
            }
            None => {
                eprintln!("Error converting PDF to text.");
                Ok(Outcome::Failed)
            }
        }
    }

    /// Text-layer attempt. Failures and empty text layers both mean
    /// "no text here"; failures are additionally reported on stderr.
    fn try_text_layer(&self, input: &Path) -> Option<String> {
        match extract_text_layer(input) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                debug!(input = %input.display(), "document has no text layer");
                None
            }
            Err(e) => {
                eprintln!("{}", e);
                None
            }
        }
    }

    /// OCR attempt. An empty recognition result counts as failure.
    fn try_ocr(&self, input: &Path) -> Option<String> {
        match self.run_ocr(input) {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => {
                debug!(input = %input.display(), "OCR produced no text");
                None
            }
            Err(e) => {
                eprintln!("{}", e);
                None
            }
        }
    }

    /// The rasterize-and-recognize fallback.
    ///
    /// PDF inputs are rendered into a temporary directory that lives
    /// exactly as long as this call; it is removed on success and on
    /// every error path. Other inputs are treated as single images:
    /// a one-page PDF wrap is written to a temporary path (removed the
    /// same way) and the original image is recognized directly,
    /// untrimmed.
    fn run_ocr(&self, input: &Path) -> Result<String> {
        if is_pdf(input) {
            let pages_dir = tempfile::Builder::new().prefix("pdftoimg_").tempdir()?;
            let images = self.rasterizer.rasterize(input, pages_dir.path())?;
            debug!(pages = images.len(), "page images ready for OCR");
            recognize_pages(self.engine.as_ref(), &images)
        } else {
            let wrapped = tempfile::Builder::new()
                .prefix("pdftotext_")
                .suffix(".pdf")
                .tempfile()?;
            write_image_pdf(input, wrapped.path())?;
            self.engine.recognize(input)
        }
    }

    fn write(&self, text: &str) -> Result<()> {
        write_output(
            text,
            self.options.output.as_deref(),
            self.options.filter.as_deref(),
        )
    }
}

/// A builder for configuring a conversion [`Pipeline`].
///
/// # Example
/// ```ignore
/// use pdftotext_core::pipeline::PipelineBuilder;
///
/// let pipeline = PipelineBuilder::new()
///     .output("out.txt")
///     .filter("invoice")
///     .language("deu")
///     .build();
/// ```
pub struct PipelineBuilder {
    options: ConvertOptions,
    rasterizer: Option<Box<dyn PageRasterizer>>,
    engine: Option<Box<dyn OcrEngine>>,
}

impl PipelineBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    /// Creates a builder starting from `options`.
    pub fn with_options(options: ConvertOptions) -> Self {
        Self {
            options,
            rasterizer: None,
            engine: None,
        }
    }

    /// Sets the destination file (stdout when unset).
    pub fn output(mut self, path: impl AsRef<Path>) -> Self {
        self.options.output = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keeps only lines containing `term`, case-insensitively.
    pub fn filter(mut self, term: &str) -> Self {
        self.options.filter = Some(term.to_string());
        self
    }

    /// Sets the OCR recognition language (default `"eng"`).
    pub fn language(mut self, language: &str) -> Self {
        self.options.language = language.to_string();
        self
    }

    /// Sets the rasterization density (default 300 DPI).
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.options.dpi = dpi;
        self
    }

    /// Names the external converter program explicitly.
    pub fn converter_program(mut self, program: &str) -> Self {
        self.options.converter = Some(program.to_string());
        self
    }

    /// Replaces the page rasterizer. Tests use this to run the
    /// pipeline without the external converter.
    pub fn rasterizer(mut self, rasterizer: Box<dyn PageRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Replaces the OCR engine.
    pub fn ocr_engine(mut self, engine: Box<dyn OcrEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Assembles the pipeline, filling in the stock collaborators for
    /// any that were not replaced.
    pub fn build(self) -> Pipeline {
        let Self {
            options,
            rasterizer,
            engine,
        } = self;
        let rasterizer = rasterizer.unwrap_or_else(|| {
            Box::new(MagickRasterizer::new(
                locate_converter(options.converter.as_deref()),
                options.dpi,
            ))
        });
        let engine =
            engine.unwrap_or_else(|| Box::new(TesseractEngine::new(&options.language)));
        Pipeline {
            options,
            rasterizer,
            engine,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
