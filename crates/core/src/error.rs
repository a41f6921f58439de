//! Error types for the PDF to text conversion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for conversion operations.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("rasterization failed: {0}")]
    Rasterization(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("cannot write output to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience Result type alias for ConvertError.
pub type Result<T> = std::result::Result<T, ConvertError>;
