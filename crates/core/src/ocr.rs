//! OCR engine adapter.
//!
//! Wraps the Tesseract binding behind a small trait so the pipeline
//! can run against a substitute engine in tests.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConvertError, Result};

/// Recognizes text in a single raster image.
pub trait OcrEngine {
    /// Run the engine against one image and return the recognized text.
    fn recognize(&self, image: &Path) -> Result<String>;
}

/// OCR engine backed by the system Tesseract installation.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    language: String,
}

impl TesseractEngine {
    /// Creates an engine recognizing the given language (e.g. `"eng"`).
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &Path) -> Result<String> {
        if !image.exists() {
            return Err(ConvertError::Ocr(format!(
                "image not found: {}",
                image.display()
            )));
        }
        let path = image.to_str().ok_or_else(|| {
            ConvertError::Ocr(format!("non-UTF-8 image path: {}", image.display()))
        })?;

        debug!(image = %image.display(), language = %self.language, "recognizing image");
        let text = tesseract::Tesseract::new(None, Some(self.language.as_str()))
            .map_err(|e| ConvertError::Ocr(format!("engine init: {}", e)))?
            .set_image(path)
            .map_err(|e| ConvertError::Ocr(format!("load {}: {}", image.display(), e)))?
            .recognize()
            .map_err(|e| ConvertError::Ocr(format!("recognize {}: {}", image.display(), e)))?
            .get_text()
            .map_err(|e| ConvertError::Ocr(format!("read text: {}", e)))?;
        Ok(text)
    }
}

/// Run OCR over a list of page images in order.
///
/// Per-image results are joined with a single newline and the combined
/// string is trimmed of leading and trailing whitespace. Single-image
/// recognition that must stay untrimmed goes through
/// [`OcrEngine::recognize`] directly.
pub fn recognize_pages(engine: &dyn OcrEngine, images: &[PathBuf]) -> Result<String> {
    let mut parts: Vec<String> = Vec::with_capacity(images.len());
    for image in images {
        parts.push(engine.recognize(image)?);
    }
    Ok(parts.join("\n").trim().to_string())
}
