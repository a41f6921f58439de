//! End-to-end tests for the pdftotext binary.
//!
//! Input documents are assembled on the fly with lopdf/image; nothing
//! binary is checked in. Tests that need ImageMagick and Tesseract
//! installed are marked `#[ignore]` and run with `cargo test -- --ignored`.

use std::fs;
use std::path::Path;
use std::process::Command;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

// ============================================================================
// Helper functions
// ============================================================================

/// Run pdftotext with given arguments and return (exit_code, stdout, stderr).
fn run_pdftotext(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pdftotext"))
        .args(args)
        .output()
        .expect("failed to execute pdftotext");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Build a one-page PDF at `path`; with `Some(text)` it carries a text
/// layer, with `None` the page paints nothing.
fn build_pdf(path: &Path, text: Option<&str>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let operations = match text {
        Some(text) => vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
        None => vec![],
    };
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
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
    doc.save(path).unwrap();
}

// ============================================================================
// Text-layer path
// ============================================================================

#[test]
fn test_text_pdf_prints_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("searchable.pdf");
    build_pdf(&input, Some("Quarterly report for review"));

    let (code, stdout, stderr) = run_pdftotext(&[input.to_str().unwrap()]);

    assert_eq!(code, 0);
    assert!(
        stdout.to_lowercase().contains("quarterly"),
        "unexpected stdout: {:?}",
        stdout
    );
    assert!(stderr.contains("PDF contains extractable text."));
}

#[test]
fn test_text_pdf_output_file_and_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("searchable.pdf");
    build_pdf(&input, Some("Quarterly report for review"));
    let output = dir.path().join("out.txt");

    let (code, stdout, stderr) = run_pdftotext(&[
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);

    assert_eq!(code, 0);
    assert!(stdout.is_empty(), "text must go to the file, not stdout");
    assert!(stderr.contains("Text has been written to"));
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.to_lowercase().contains("quarterly"));
}

#[test]
fn test_filter_keeps_only_matching_lines() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("searchable.pdf");
    build_pdf(&input, Some("apple pie"));

    let (code, stdout, _stderr) =
        run_pdftotext(&[input.to_str().unwrap(), "-f", "APPLE"]);
    assert_eq!(code, 0);
    assert!(stdout.to_lowercase().contains("apple pie"));

    let (code, stdout, _stderr) =
        run_pdftotext(&[input.to_str().unwrap(), "-f", "banana"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "\n", "no matching lines leaves only the newline");
}

#[test]
fn test_repeated_runs_produce_identical_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("searchable.pdf");
    build_pdf(&input, Some("Stable output expected"));
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");

    let (code, _, _) =
        run_pdftotext(&[input.to_str().unwrap(), "-o", first.to_str().unwrap()]);
    assert_eq!(code, 0);
    let (code, _, _) =
        run_pdftotext(&[input.to_str().unwrap(), "-o", second.to_str().unwrap()]);
    assert_eq!(code, 0);

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

// ============================================================================
// Failure paths
// ============================================================================

#[test]
fn test_blank_pdf_without_converter_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scanned.pdf");
    build_pdf(&input, None);
    let output = dir.path().join("out.txt");

    // Pointing at a converter that does not exist forces the OCR
    // attempt to fail without ImageMagick installed.
    let (code, stdout, stderr) = run_pdftotext(&[
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--converter",
        "definitely-not-a-converter",
    ]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("PDF does not contain extractable text. Attempting OCR..."));
    assert!(stderr.contains("Error converting PDF to text."));
    assert!(!output.exists(), "no output file on failure");
}

#[test]
fn test_nonexistent_input_exits_nonzero() {
    let (code, stdout, _stderr) = run_pdftotext(&[
        "no-such-file.pdf",
        "--converter",
        "definitely-not-a-converter",
    ]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
}

#[test]
fn test_unwritable_destination_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("searchable.pdf");
    build_pdf(&input, Some("some text"));
    let output = dir.path().join("missing-subdir").join("out.txt");

    let (code, _stdout, stderr) =
        run_pdftotext(&[input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("cannot write output"));
}

// ============================================================================
// Full OCR path (requires ImageMagick and Tesseract)
// ============================================================================

#[test]
#[ignore = "requires ImageMagick and Tesseract installed"]
fn test_blank_pdf_triggers_ocr_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scanned.pdf");
    build_pdf(&input, None);
    let output = dir.path().join("out.txt");

    let (code, _stdout, stderr) =
        run_pdftotext(&[input.to_str().unwrap(), "-o", output.to_str().unwrap()]);

    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stderr.contains("Attempting OCR"));
    assert!(output.exists());
}

#[test]
#[ignore = "requires Tesseract installed"]
fn test_standalone_image_is_recognized() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan.png");
    let img = image::RgbImage::from_pixel(640, 120, image::Rgb([255, 255, 255]));
    img.save(&input).unwrap();

    let (code, _stdout, stderr) = run_pdftotext(&[input.to_str().unwrap()]);

    // A blank page may legitimately recognize to nothing; the run must
    // still terminate cleanly on one of the two documented paths.
    assert!(code == 0 || code == 1, "stderr: {}", stderr);
    assert!(stderr.contains("Attempting OCR"));
}
