use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::CombineArgs;
use crate::docx::read_lesson_text;
use crate::syllabus::SectionProfile;
use crate::util::{ensure_directory, list_matching_files};

pub fn run(args: CombineArgs) -> Result<()> {
    let profile = SectionProfile::for_section(args.target.section);
    let dir = args.target.resolved_dir();
    let output = args.output.unwrap_or_else(|| {
        dir.join(format!(
            "All section {}.txt",
            profile.section.as_str().to_lowercase()
        ))
    });

    let files = list_matching_files(&dir, &profile.glob())?;
    let lines = combine_files(&files, &output)?;

    info!(files = files.len(), lines, output = %output.display(), "combined lesson files");
    println!(
        "Successfully combined {} files into: {}",
        files.len(),
        output.display()
    );

    Ok(())
}

pub fn combine_files(files: &[PathBuf], output: &Path) -> Result<usize> {
    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    let file = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    let mut written = 0_usize;

    for path in files {
        let text = match read_lesson_text(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(file = %path.display(), error = %format!("{err:#}"), "skipping unreadable lesson file");
                continue;
            }
        };

        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            writeln!(writer, "{line}")
                .with_context(|| format!("failed to write {}", output.display()))?;
            written += 1;
        }
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", output.display()))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::docx::test_support::word_document;

    #[test]
    fn combine_keeps_order_and_drops_blank_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("Lesson_B1-1_Part_1.json");
        let second = dir.path().join("Lesson_B1-1_Part_2.json");
        fs::write(&first, "alpha\n\n   \nbeta\n").expect("write");
        fs::write(&second, "gamma\n").expect("write");

        let output = dir.path().join("out").join("All section b.txt");
        let written = combine_files(&[first, second], &output).expect("combine");

        assert_eq!(written, 3);
        let combined = fs::read_to_string(&output).expect("read");
        assert_eq!(combined, "alpha\nbeta\ngamma\n");
    }

    #[test]
    fn combine_reads_word_documents_and_skips_binary_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let word = dir.path().join("Lesson_B1-1_Part_1.docx");
        let binary = dir.path().join("Lesson_B1-1_Part_2.docx");
        let text = dir.path().join("Lesson_B1-1_Part_3.docx");
        fs::write(&word, word_document(&["alpha", "", "beta"])).expect("write");
        fs::write(&binary, [0xff_u8, 0x00, 0xfe, b'\n']).expect("write");
        fs::write(&text, "gamma\n").expect("write");

        let output = dir.path().join("All section b.txt");
        let written = combine_files(&[word, binary, text], &output).expect("combine");

        assert_eq!(written, 3);
        let combined = fs::read_to_string(&output).expect("read");
        assert_eq!(combined, "alpha\nbeta\ngamma\n");
        assert!(!combined.contains('\u{FFFD}'));
    }
}
