//! pdftotext-core - PDF to plain text conversion with OCR fallback.
//!
//! Converts PDF documents (and single images) into plain text. A
//! document's embedded text layer is tried first; when it is missing
//! or empty, pages are rasterized through an external converter and
//! recognized with Tesseract. The result can be filtered line-by-line
//! and written to a file or to stdout.

pub mod error;
pub mod image_pdf;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod raster;
pub mod text_layer;

pub use error::{ConvertError, Result};
pub use pipeline::{ConvertOptions, Outcome, Pipeline, PipelineBuilder};
