//! PDF page rasterization through an external converter process.
//!
//! The converter is an ImageMagick-style tool invoked once per
//! document; it writes one image per page into a caller-owned
//! directory, so the caller controls how long the images live.

use std::path::{Path, PathBuf};
use std::process::Command;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{ConvertError, Result};

/// Environment variable naming the converter program.
pub const CONVERTER_ENV: &str = "PDFTOTEXT_CONVERTER";

/// Zero-padded output pattern. The converter widens the field for
/// documents past 999 pages, so produced files are ordered by parsed
/// page number rather than by filename bytes.
const PAGE_PATTERN: &str = "page-%03d.png";

/// Renders PDF pages into raster images.
pub trait PageRasterizer {
    /// Render every page of `pdf` into `output_dir`, one image per
    /// page, and return the image paths in page order.
    fn rasterize(&self, pdf: &Path, output_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Probed once per process: prefer the ImageMagick 7 `magick` entry
/// point, fall back to the classic `convert` name.
static DEFAULT_CONVERTER: Lazy<String> = Lazy::new(|| {
    for candidate in ["magick", "convert"] {
        let found = Command::new(candidate)
            .arg("-version")
            .output()
            .is_ok_and(|out| out.status.success());
        if found {
            return candidate.to_string();
        }
    }
    "convert".to_string()
});

/// Resolve the converter program name.
///
/// Precedence: explicit override, then the `PDFTOTEXT_CONVERTER`
/// environment variable, then the probed default.
pub fn locate_converter(explicit: Option<&str>) -> String {
    if let Some(program) = explicit {
        return program.to_string();
    }
    if let Ok(program) = std::env::var(CONVERTER_ENV)
        && !program.is_empty()
    {
        return program;
    }
    DEFAULT_CONVERTER.clone()
}

/// Rasterizer shelling out to an ImageMagick-style converter.
///
/// Pages are rendered at the configured density, full quality, with a
/// white background and the alpha channel flattened.
#[derive(Debug, Clone)]
pub struct MagickRasterizer {
    program: String,
    dpi: u32,
}

impl MagickRasterizer {
    /// Creates a rasterizer running `program` at `dpi` density.
    pub fn new(program: String, dpi: u32) -> Self {
        Self { program, dpi }
    }
}

impl Default for MagickRasterizer {
    fn default() -> Self {
        Self::new(locate_converter(None), 300)
    }
}

impl PageRasterizer for MagickRasterizer {
    fn rasterize(&self, pdf: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let pattern = output_dir.join(PAGE_PATTERN);
        debug!(program = %self.program, dpi = self.dpi, pdf = %pdf.display(), "rasterizing");

        let output = Command::new(&self.program)
            .arg("-density")
            .arg(self.dpi.to_string())
            .arg("-quality")
            .arg("100")
            .arg("-background")
            .arg("white")
            .arg("-alpha")
            .arg("remove")
            .arg(pdf)
            .arg(&pattern)
            .output()
            .map_err(|e| {
                ConvertError::Rasterization(format!("cannot run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::Rasterization(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        collect_page_images(output_dir)
    }
}

/// List the page images produced in `dir`, ordered by page number.
pub(crate) fn collect_page_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("page-") && name.ends_with(".png"))
        })
        .collect();
    images.sort_by_key(|path| (page_number(path), path.clone()));

    if images.is_empty() {
        return Err(ConvertError::Rasterization(
            "converter produced no page images".to_string(),
        ));
    }
    Ok(images)
}

/// Parse the page number out of a `page-NNN.png` filename.
fn page_number(path: &Path) -> Option<u32> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("page-"))
        .and_then(|name| name.strip_suffix(".png"))
        .and_then(|digits| digits.parse().ok())
}
