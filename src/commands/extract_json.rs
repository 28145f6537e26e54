use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::Value;
use tracing::{info, warn};

use crate::cli::ExtractJsonArgs;
use crate::docx::read_lesson_text;
use crate::syllabus::SectionProfile;
use crate::util::{display_file_name, list_matching_files, write_json_pretty};

#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Json(Value),
    InvalidJson(String),
    NoJson(String),
}

pub fn run(args: ExtractJsonArgs) -> Result<()> {
    let profile = SectionProfile::for_section(args.target.section);
    let dir = args.target.resolved_dir();
    let files = list_matching_files(&dir, &profile.glob())?;
    let object_span = object_span_regex()?;

    println!("Found {} files to convert", files.len());
    println!();

    let mut converted = 0_usize;
    let mut errors = 0_usize;

    for path in &files {
        let name = display_file_name(path);
        match convert_file(path, &object_span) {
            Ok(Extracted::Json(_)) => {
                println!("[OK] Converted: {name}");
                converted += 1;
            }
            Ok(Extracted::InvalidJson(_)) => {
                println!("[WARNING] Not valid JSON, saved as text: {name}");
                converted += 1;
            }
            Ok(Extracted::NoJson(_)) => {
                println!("[WARNING] No JSON found, saved as text: {name}");
                converted += 1;
            }
            Err(err) => {
                warn!(file = %path.display(), error = %err, "conversion failed");
                println!("[ERROR] Failed to convert {name}: {err:#}");
                errors += 1;
            }
        }
    }

    println!();
    println!("Successfully converted: {converted}");
    println!("Errors: {errors}");
    info!(converted, errors, "json extraction complete");

    Ok(())
}

pub fn object_span_regex() -> Result<Regex> {
    Regex::new(r"(?s)\{.*\}").context("failed to compile JSON object regex")
}

pub fn extract_json(text: &str, object_span: &Regex) -> Extracted {
    let content = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join("\n");

    let Some(span) = object_span.find(&content) else {
        return Extracted::NoJson(content);
    };

    match serde_json::from_str::<Value>(span.as_str()) {
        Ok(value) => Extracted::Json(value),
        Err(_) => Extracted::InvalidJson(content),
    }
}

fn convert_file(path: &Path, object_span: &Regex) -> Result<Extracted> {
    // Nothing is written unless the source decoded cleanly.
    let text = read_lesson_text(path)?;

    let extracted = extract_json(&text, object_span);
    match &extracted {
        Extracted::Json(value) => write_json_pretty(path, value)?,
        Extracted::InvalidJson(content) | Extracted::NoJson(content) => {
            fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    Ok(extracted)
}
