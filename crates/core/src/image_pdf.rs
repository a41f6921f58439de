//! Wrapping a standalone image as a one-page PDF.

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tracing::debug;

use crate::error::{ConvertError, Result};

/// Convert a single image file into a one-page PDF at `output`.
///
/// The image is re-encoded as JPEG and embedded full-page; the page
/// size matches the image's pixel dimensions at one point per pixel.
/// Any existing file at `output` is overwritten.
pub fn write_image_pdf(image_path: &Path, output: &Path) -> Result<()> {
    let img = image::open(image_path).map_err(|e| {
        ConvertError::Rasterization(format!("cannot read image {}: {}", image_path.display(), e))
    })?;
    let rgb8 = img.to_rgb8();
    let (width, height) = {
        let (w, h) = rgb8.dimensions();
        (w as i64, h as i64)
    };
    let rgb = image::DynamicImage::ImageRgb8(rgb8);

    let mut jpeg = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .map_err(|e| ConvertError::Rasterization(format!("JPEG encode: {}", e)))?;
    debug!(width, height, bytes = jpeg.len(), "image re-encoded for embedding");

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| ConvertError::Rasterization(format!("content stream: {}", e)))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(output).map_err(|e| {
        ConvertError::Rasterization(format!("cannot write {}: {}", output.display(), e))
    })?;
    Ok(())
}
