use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use regex::Regex;

const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
const DOCUMENT_XML: &str = "word/document.xml";

pub fn is_zip(raw: &[u8]) -> bool {
    raw.starts_with(ZIP_SIGNATURE)
}

// Lesson files are either Word documents (possibly already renamed to .json) or UTF-8 text.
// Anything else is an error so callers never rewrite undecodable bytes.
pub fn read_lesson_text(path: &Path) -> Result<String> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    if is_zip(&raw) {
        let paragraphs = docx_paragraphs(&raw)
            .with_context(|| format!("failed to extract Word text from {}", path.display()))?;
        return Ok(paragraphs.join("\n"));
    }

    match String::from_utf8(raw) {
        Ok(text) => Ok(text),
        Err(_) => bail!(
            "{} is neither a Word document nor UTF-8 text",
            path.display()
        ),
    }
}

pub fn docx_paragraphs(raw: &[u8]) -> Result<Vec<String>> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(raw)).context("failed to open Word archive")?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .with_context(|| format!("Word archive has no {DOCUMENT_XML}"))?
        .read_to_string(&mut xml)
        .with_context(|| format!("failed to read {DOCUMENT_XML}"))?;

    paragraphs_from_document_xml(&xml)
}

pub fn paragraphs_from_document_xml(xml: &str) -> Result<Vec<String>> {
    let paragraph = Regex::new(r"(?s)<w:p[ >].*?</w:p>")
        .context("failed to compile Word paragraph regex")?;
    let run = Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab/>")
        .context("failed to compile Word text regex")?;

    let mut paragraphs = Vec::new();
    for block in paragraph.find_iter(xml) {
        let mut text = String::new();
        for captures in run.captures_iter(block.as_str()) {
            match captures.get(1) {
                Some(value) => text.push_str(&unescape_xml(value.as_str())),
                None => text.push('\t'),
            }
        }
        paragraphs.push(text);
    }

    Ok(paragraphs)
}

fn unescape_xml(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
