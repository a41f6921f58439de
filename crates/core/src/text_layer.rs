//! Text-layer extraction from PDF documents.
//!
//! Asks every page for its embedded text and joins the results in
//! document order. An empty result is a valid outcome meaning the
//! document carries no text layer; it is distinct from an open or
//! parse failure.

use std::path::Path;

use pdf_oxide::document::PdfDocument;
use tracing::debug;

use crate::error::{ConvertError, Result};

/// Extract the embedded text layer of a PDF.
///
/// Every page's text is joined with a single newline, so a page
/// without text still keeps its position in the join. The document
/// handle is scoped to this call and released before return.
///
/// # Arguments
/// * `path` - Path to the PDF file.
///
/// # Returns
/// The joined page text. Empty when no page has extractable text.
///
/// # Errors
/// `ConvertError::Extraction` when the file cannot be opened, is not a
/// valid PDF, or a page's text cannot be read.
pub fn extract_text_layer(path: &Path) -> Result<String> {
    let mut doc = PdfDocument::open(path).map_err(|e| {
        ConvertError::Extraction(format!("cannot open {}: {}", path.display(), e))
    })?;
    let page_count = doc
        .page_count()
        .map_err(|e| ConvertError::Extraction(format!("cannot read page count: {}", e)))?;

    let mut pages: Vec<String> = Vec::with_capacity(page_count);
    for page_index in 0..page_count {
        let text = doc.extract_text(page_index).map_err(|e| {
            ConvertError::Extraction(format!("page {}: {}", page_index + 1, e))
        })?;
        pages.push(text);
    }
    debug!(page_count, path = %path.display(), "text layer read");

    Ok(pages.join("\n"))
}
