use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::RenameArgs;
use crate::syllabus::SectionProfile;
use crate::util::{display_file_name, file_name_string, list_matching_files};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameSummary {
    pub renamed: Vec<RenamePlan>,
    pub skipped: Vec<RenamePlan>,
}

pub fn run(args: RenameArgs) -> Result<()> {
    let profile = SectionProfile::for_section(args.target.section);
    let dir = args.target.resolved_dir();

    let plans = plan_renames(&dir, &args.from, &args.to)?;
    println!("Found {} {} files to rename", plans.len(), args.from);

    if args.dry_run {
        for plan in &plans {
            println!(
                "Would rename: {} -> {}",
                display_file_name(&plan.from),
                display_file_name(&plan.to)
            );
        }
        info!(count = plans.len(), "rename dry-run complete");
        return Ok(());
    }

    let summary = apply_renames(plans)?;
    for plan in &summary.renamed {
        println!(
            "Renamed: {} -> {}",
            display_file_name(&plan.from),
            display_file_name(&plan.to)
        );
    }
    println!(
        "\nSuccessfully renamed {} files from {} to {}",
        summary.renamed.len(),
        args.from,
        args.to
    );
    if !summary.skipped.is_empty() {
        println!("Skipped {} files whose target already exists", summary.skipped.len());
    }

    let lesson_count = list_matching_files(&dir, &profile.glob())?.len();
    println!("\nTotal lesson files now: {lesson_count}");

    Ok(())
}

pub fn plan_renames(dir: &Path, from: &str, to: &str) -> Result<Vec<RenamePlan>> {
    if from.is_empty() {
        bail!("--from suffix must not be empty");
    }

    let pattern = format!("*{from}");
    let mut plans = Vec::new();
    for path in list_matching_files(dir, &pattern)? {
        let name = file_name_string(&path)?;
        let Some(stem) = name.strip_suffix(from) else {
            continue;
        };
        plans.push(RenamePlan {
            to: path.with_file_name(format!("{stem}{to}")),
            from: path,
        });
    }

    Ok(plans)
}

pub fn apply_renames(plans: Vec<RenamePlan>) -> Result<RenameSummary> {
    let mut summary = RenameSummary::default();

    for plan in plans {
        if plan.to.exists() {
            warn!(
                from = %plan.from.display(),
                to = %plan.to.display(),
                "rename target already exists; skipping"
            );
            summary.skipped.push(plan);
            continue;
        }

        fs::rename(&plan.from, &plan.to).with_context(|| {
            format!(
                "failed to rename {} to {}",
                plan.from.display(),
                plan.to.display()
            )
        })?;
        summary.renamed.push(plan);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_json_suffix_is_stripped_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Lesson_B1-1_Part_1.json.json"), "{}").expect("write");
        fs::write(dir.path().join("Lesson_B1-1_Part_2.json"), "{}").expect("write");

        let plans = plan_renames(dir.path(), ".json.json", ".json").expect("plan");
        assert_eq!(plans.len(), 1);

        let summary = apply_renames(plans).expect("apply");
        assert_eq!(summary.renamed.len(), 1);
        assert!(dir.path().join("Lesson_B1-1_Part_1.json").exists());
        assert!(!dir.path().join("Lesson_B1-1_Part_1.json.json").exists());
    }

    #[test]
    fn existing_target_is_skipped_not_overwritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Lesson_B1-1_Part_1.docx"), "doc").expect("write");
        fs::write(dir.path().join("Lesson_B1-1_Part_1.json"), "keep").expect("write");
        fs::write(dir.path().join("Lesson_B1-2_Part_1.docx"), "doc").expect("write");

        let plans = plan_renames(dir.path(), ".docx", ".json").expect("plan");
        let summary = apply_renames(plans).expect("apply");

        assert_eq!(summary.renamed.len(), 1);
        assert_eq!(summary.skipped.len(), 1);
        let kept = fs::read_to_string(dir.path().join("Lesson_B1-1_Part_1.json")).expect("read");
        assert_eq!(kept, "keep");
        assert!(dir.path().join("Lesson_B1-2_Part_1.json").exists());
    }

    #[test]
    fn empty_from_suffix_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(plan_renames(dir.path(), "", ".json").is_err());
    }
}
