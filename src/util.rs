use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;
use tracing::warn;

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create json file: {}", path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", path.display()))?;

    Ok(())
}

pub fn glob_regex(pattern: &str) -> Result<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<String>>()
        .join(".*");

    Regex::new(&format!("^{body}$"))
        .with_context(|| format!("failed to compile filename pattern: {pattern}"))
}

pub fn list_matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = glob_regex(pattern)?;
    let mut paths = Vec::new();

    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();

        // Follows symlinks so linked lesson files are listed too.
        if !path.is_file() {
            continue;
        }

        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| matcher.is_match(name))
            .unwrap_or(false);

        if matches {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

// An unreadable or missing directory yields an empty listing; reports still run.
pub fn list_matching_files_or_empty(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    match list_matching_files(dir, pattern) {
        Ok(paths) => paths,
        Err(err) => {
            warn!(dir = %dir.display(), error = %format!("{err:#}"), "treating directory as empty");
            Vec::new()
        }
    }
}

pub fn file_name_string(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))
}

pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn print_banner(title: &str) {
    println!("{}", "=".repeat(70));
    println!("{title}");
    println!("{}", "=".repeat(70));
    println!();
}

pub fn print_rule() {
    println!("{}", "=".repeat(70));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_regex_matches_prefix_and_suffix_only() {
        let matcher = glob_regex("Lesson_B*.json").expect("pattern should compile");
        assert!(matcher.is_match("Lesson_B1-1_Part_1.json"));
        assert!(!matcher.is_match("Lesson_A1-1_Part_1.json"));
        assert!(!matcher.is_match("Lesson_B1-1_Part_1.json.docx"));
        assert!(matcher.is_match("Lesson_B1-1_Part_1.json.json"));
    }

    #[test]
    fn list_matching_files_skips_directories_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Lesson_B1-2_Part_1.json"), "{}").expect("write");
        fs::write(dir.path().join("Lesson_B1-1_Part_1.json"), "{}").expect("write");
        fs::write(dir.path().join("notes.txt"), "x").expect("write");
        fs::create_dir(dir.path().join("Lesson_B9-9_Part_1.json")).expect("mkdir");

        let files = list_matching_files(dir.path(), "Lesson_B*.json").expect("listing");
        let names = files
            .iter()
            .map(|path| file_name_string(path).expect("utf-8"))
            .collect::<Vec<String>>();

        assert_eq!(
            names,
            vec!["Lesson_B1-1_Part_1.json", "Lesson_B1-2_Part_1.json"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn list_matching_files_follows_symlinks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("source.json");
        fs::write(&target, "{}").expect("write");
        std::os::unix::fs::symlink(&target, dir.path().join("Lesson_B1-1_Part_1.json"))
            .expect("symlink");

        let files = list_matching_files(dir.path(), "Lesson_B*.json").expect("listing");
        assert_eq!(files, vec![dir.path().join("Lesson_B1-1_Part_1.json")]);
    }

    #[test]
    fn missing_directory_lists_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope");

        assert!(list_matching_files(&missing, "Lesson_B*.json").is_err());
        assert!(list_matching_files_or_empty(&missing, "Lesson_B*.json").is_empty());
    }
}
