use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::cli::ExtractPdfArgs;
use crate::model::{ExtractionPayload, PageImage, PageText, PdfExtraction};
use crate::util::ensure_directory;

pub const USAGE: &str = "Usage: lessonkit extract-pdf <pdf_path>";

// Rasterisation resolution for OCR; twice the 72 dpi page size.
const OCR_DPI: u32 = 144;
const OCR_PROGRAM: &str = "tesseract";

pub fn run(args: ExtractPdfArgs) -> Result<()> {
    let pdf_path = match single_path(&args.paths) {
        Ok(path) => path,
        Err(message) => {
            print_payload(&ExtractionPayload::Error { error: message })?;
            bail!("extract-pdf expects exactly one <pdf_path>, got {}", args.paths.len());
        }
    };

    debug!(path = %pdf_path.display(), "processing pdf");
    let payload = match extract_pdf(pdf_path, &args.ocr_lang) {
        Ok(extraction) => {
            info!(
                text_blocks = extraction.text.len(),
                images = extraction.images.len(),
                "pdf extraction complete"
            );
            ExtractionPayload::Success(extraction)
        }
        Err(err) => {
            warn!(path = %pdf_path.display(), error = %format!("{err:#}"), "pdf extraction failed");
            ExtractionPayload::Error {
                error: format!("{err:#}"),
            }
        }
    };

    print_payload(&payload)
}

pub fn single_path(paths: &[PathBuf]) -> std::result::Result<&Path, String> {
    match paths {
        [path] => Ok(path.as_path()),
        _ => Err(USAGE.to_string()),
    }
}

fn print_payload(payload: &ExtractionPayload) -> Result<()> {
    let encoded = serde_json::to_string(payload).context("failed to serialize extraction payload")?;
    println!("{encoded}");
    Ok(())
}

pub fn extract_pdf(pdf_path: &Path, ocr_lang: &str) -> Result<PdfExtraction> {
    if !pdf_path.is_file() {
        bail!("no such file: {}", pdf_path.display());
    }

    let mut extraction = PdfExtraction::default();

    let pages = extract_pages_with_pdftotext(pdf_path)?;
    for (offset, page_text) in pages.iter().enumerate() {
        let page = offset + 1;
        let mut content = page_text.trim().to_string();

        if content.is_empty() {
            debug!(page, "page has no text, using OCR");
            content = extract_page_with_ocr(pdf_path, page, ocr_lang)?;
        }

        if !content.is_empty() {
            extraction.text.push(PageText { page, content });
        }
    }

    extraction.images = extract_images(pdf_path)?;
    Ok(extraction)
}

// One entry per page, split on the form feed pdftotext emits after every page.
pub fn split_pages(raw: &str) -> Vec<String> {
    let mut pages = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect::<Vec<String>>();

    if pages.last().is_some_and(|last| last.trim().is_empty()) {
        pages.pop();
    }

    pages
}

fn extract_pages_with_pdftotext(pdf_path: &Path) -> Result<Vec<String>> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(split_pages(&String::from_utf8_lossy(&output.stdout)))
}

fn scratch_root(pdf_path: &Path, label: &str) -> PathBuf {
    let safe_stem = pdf_path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("pdf")
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() {
                character
            } else {
                '_'
            }
        })
        .collect::<String>();

    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    std::env::temp_dir().join(format!(
        "lessonkit_{}_{}_{}_{}",
        label,
        safe_stem,
        std::process::id(),
        stamp
    ))
}

fn extract_page_with_ocr(pdf_path: &Path, page_number: usize, ocr_lang: &str) -> Result<String> {
    let output_root = scratch_root(pdf_path, &format!("ocr{page_number}"));
    let png_path = PathBuf::from(format!("{}.png", output_root.display()));

    let pdftoppm_output = Command::new("pdftoppm")
        .arg("-f")
        .arg(page_number.to_string())
        .arg("-l")
        .arg(page_number.to_string())
        .arg("-r")
        .arg(OCR_DPI.to_string())
        .arg("-singlefile")
        .arg("-png")
        .arg(pdf_path)
        .arg(&output_root)
        .output()
        .with_context(|| format!("failed to execute pdftoppm for {}", pdf_path.display()))?;

    if !pdftoppm_output.status.success() {
        let stderr = String::from_utf8_lossy(&pdftoppm_output.stderr);
        bail!(
            "pdftoppm returned non-zero exit status for {} page {}: {}",
            pdf_path.display(),
            page_number,
            stderr.trim()
        );
    }

    if !png_path.exists() {
        bail!(
            "pdftoppm did not produce expected image for {} page {}",
            pdf_path.display(),
            page_number
        );
    }

    ocr_image(&png_path, ocr_lang, OCR_PROGRAM)
        .with_context(|| format!("OCR failed for {} page {}", pdf_path.display(), page_number))
}

// The rasterised page is removed whether or not the OCR program could run.
fn ocr_image(png_path: &Path, ocr_lang: &str, program: &str) -> Result<String> {
    let output = Command::new(program)
        .arg(png_path)
        .arg("stdout")
        .arg("-l")
        .arg(ocr_lang)
        .output();

    let _ = fs::remove_file(png_path);

    let output =
        output.with_context(|| format!("failed to execute {program} for {}", png_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "{program} returned non-zero exit status for {}: {}",
            png_path.display(),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .replace('\u{0000}', "")
        .trim()
        .to_string())
}

fn extract_images(pdf_path: &Path) -> Result<Vec<PageImage>> {
    let scratch = scratch_root(pdf_path, "images");
    ensure_directory(&scratch)?;

    let result = extract_images_into(pdf_path, &scratch);
    let _ = fs::remove_dir_all(&scratch);
    result
}

fn extract_images_into(pdf_path: &Path, scratch: &Path) -> Result<Vec<PageImage>> {
    let output = Command::new("pdfimages")
        .arg("-png")
        .arg("-p")
        .arg(pdf_path)
        .arg(scratch.join("img"))
        .output()
        .with_context(|| format!("failed to execute pdfimages for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdfimages returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    let name_pattern = image_name_regex()?;
    let mut found = Vec::new();
    let entries =
        fs::read_dir(scratch).with_context(|| format!("failed to read {}", scratch.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read entry in {}", scratch.display()))?
            .path();
        let Some((page, index)) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| parse_image_name(name, &name_pattern))
        else {
            continue;
        };
        found.push((page, index, path));
    }
    found.sort();

    let mut images = Vec::with_capacity(found.len());
    for (page, _, path) in found {
        let bytes = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        images.push(PageImage {
            page,
            image: STANDARD.encode(bytes),
        });
    }

    Ok(images)
}

fn image_name_regex() -> Result<Regex> {
    Regex::new(r"^img-(\d+)-(\d+)\.png$").context("failed to compile pdfimages filename regex")
}

// Parses `img-PPP-NNN.png` as written by `pdfimages -p` into (page, image index).
fn parse_image_name(name: &str, pattern: &Regex) -> Option<(usize, usize)> {
    let captures = pattern.captures(name)?;
    let page = captures.get(1)?.as_str().parse().ok()?;
    let index = captures.get(2)?.as_str().parse().ok()?;
    Some((page, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_path_rejects_wrong_arity() {
        assert_eq!(single_path(&[]), Err(USAGE.to_string()));
        assert_eq!(
            single_path(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]),
            Err(USAGE.to_string())
        );
        assert_eq!(
            single_path(&[PathBuf::from("a.pdf")]),
            Ok(Path::new("a.pdf"))
        );
    }

    #[test]
    fn split_pages_keeps_blank_middle_pages() {
        let pages = split_pages("first\u{000C}\n\u{000C}third\u{0000}\u{000C}");
        assert_eq!(pages, vec!["first", "\n", "third"]);
    }

    #[test]
    fn image_names_parse_page_and_index() {
        let pattern = image_name_regex().expect("regex");
        assert_eq!(parse_image_name("img-003-012.png", &pattern), Some((3, 12)));
        assert_eq!(parse_image_name("img-003-012.ppm", &pattern), None);
    }

    #[test]
    fn missing_pdf_is_an_extraction_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = extract_pdf(&dir.path().join("absent.pdf"), "eng")
            .expect_err("missing file should fail");
        assert!(error.to_string().contains("no such file"));
    }

    #[test]
    fn page_image_is_removed_when_ocr_program_cannot_start() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png_path = dir.path().join("page.png");
        fs::write(&png_path, b"\x89PNG").expect("write");

        let error = ocr_image(&png_path, "eng", "lessonkit-missing-ocr-tool")
            .expect_err("missing program should fail");

        assert!(error.to_string().contains("failed to execute"));
        assert!(!png_path.exists());
    }
}
