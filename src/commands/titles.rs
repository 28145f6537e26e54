use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::cli::CheckTitlesArgs;
use crate::model::{ActualFile, LessonTitleResult, TitleOutcome, TitleReport};
use crate::syllabus::SectionProfile;
use crate::util::{file_name_string, list_matching_files_or_empty, print_banner, print_rule};


pub const TITLE_FIELDS: [&str; 3] = ["title", "lessonTitle", "name"];

pub trait ContentReader {
    fn read_text(&self, path: &Path) -> Result<String>;
}

pub struct FsContentReader;

impl ContentReader for FsContentReader {
    fn read_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

pub fn run(args: CheckTitlesArgs) -> Result<()> {
    let profile = SectionProfile::for_section(args.target.section);
    let dir = args.target.resolved_dir();
    info!(dir = %dir.display(), "checking lesson titles");

    let files = list_matching_files_or_empty(&dir, &profile.glob())
        .iter()
        .filter_map(|path| match file_name_string(path) {
            Ok(name) => Some(ActualFile::from_name(name)),
            Err(err) => {
                warn!(error = %err, "skipping file");
                None
            }
        })
        .collect::<Vec<ActualFile>>();

    let report = check_titles(&profile, &dir, &files, &FsContentReader);
    info!(
        lessons = report.lessons.len(),
        issues = report.issues.len(),
        "title check complete"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

pub fn check_titles(
    profile: &SectionProfile,
    dir: &Path,
    files: &[ActualFile],
    reader: &dyn ContentReader,
) -> TitleReport {
    let mut report = TitleReport::default();
    if !profile.has_titles() {
        report.issues.push(format!(
            "Section {}: No title table",
            profile.section.as_str()
        ));
        return report;
    }
    let mut checked = HashSet::new();

    for file in files {
        let Some(lesson_id) = file.parsed_id.as_deref() else {
            warn!(file = %file.name, "cannot parse lesson id from filename");
            continue;
        };
        if !checked.insert(lesson_id.to_string()) {
            continue;
        }

        let path: PathBuf = dir.join(&file.name);
        let outcome = match profile.expected_title(lesson_id) {
            None => TitleOutcome::NoExpectedTitle,
            Some(expected) => match reader.read_text(&path) {
                Ok(content) => classify_content(expected, &content),
                Err(err) => TitleOutcome::ReadError {
                    message: format!("{err:#}"),
                },
            },
        };

        if let Some(issue) = issue_label(lesson_id, &outcome) {
            report.issues.push(issue);
        }
        report.lessons.push(LessonTitleResult {
            lesson_id: lesson_id.to_string(),
            file: file.name.clone(),
            outcome,
        });
    }

    report
}

pub fn classify_content(expected: &str, content: &str) -> TitleOutcome {
    let data = match serde_json::from_str::<Value>(content) {
        Ok(data) => data,
        Err(_) => return TitleOutcome::NotValidJson,
    };

    let actual = data
        .as_object()
        .and_then(|map| first_present_field(map, &TITLE_FIELDS));

    match actual {
        Some(actual) if titles_match(expected, actual) => TitleOutcome::Ok {
            actual: actual.to_string(),
        },
        Some(actual) => TitleOutcome::Mismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        },
        None => TitleOutcome::NoTitleField {
            expected: expected.to_string(),
            found_in_content: content.to_lowercase().contains(&expected.to_lowercase()),
        },
    }
}

pub fn first_present_field<'a>(map: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a str> {
    candidates.iter().find_map(|name| {
        map.get(*name)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    })
}

pub fn titles_match(expected: &str, actual: &str) -> bool {
    let expected = expected.to_lowercase();
    let actual = actual.to_lowercase();
    expected.contains(&actual) || actual.contains(&expected)
}

fn issue_label(lesson_id: &str, outcome: &TitleOutcome) -> Option<String> {
    match outcome {
        TitleOutcome::Ok { .. } => None,
        TitleOutcome::NoTitleField {
            found_in_content: true,
            ..
        } => None,
        TitleOutcome::NoTitleField { expected, .. } => {
            Some(format!("{lesson_id}: Title '{expected}' not found"))
        }
        TitleOutcome::Mismatch { .. } => Some(format!("{lesson_id}: Title mismatch")),
        TitleOutcome::NotValidJson => Some(format!("{lesson_id}: Not valid JSON")),
        TitleOutcome::NoExpectedTitle => Some(format!("{lesson_id}: No expected title")),
        TitleOutcome::ReadError { .. } => Some(format!("{lesson_id}: Read error")),
    }
}

fn print_report(report: &TitleReport) {
    print_banner("CHECKING LESSON TITLES INSIDE FILES");

    for lesson in &report.lessons {
        let id = &lesson.lesson_id;
        match &lesson.outcome {
            TitleOutcome::Ok { actual } => println!("[OK] {id}: '{actual}'"),
            TitleOutcome::Mismatch { expected, actual } => {
                println!("[FAIL] {id}:");
                println!("       Expected: '{expected}'");
                println!("       Got:      '{actual}'");
            }
            TitleOutcome::NotValidJson => println!("[WARNING] {id}: File is not valid JSON"),
            TitleOutcome::NoTitleField {
                expected,
                found_in_content,
            } => {
                println!("[INFO] {id}: No title field found in JSON");
                if *found_in_content {
                    println!("       Expected title '{expected}' found in content");
                } else {
                    println!("       Expected title '{expected}' NOT found in content");
                }
            }
            TitleOutcome::NoExpectedTitle => println!("[WARNING] {id}: Not in the syllabus"),
            TitleOutcome::ReadError { message } => {
                println!("[ERROR] {id}: Could not read file - {message}")
            }
        }
    }

    println!();
    print_rule();
    if report.issues.is_empty() {
        println!("RESULT: All lesson titles are correct!");
    } else {
        println!("RESULT: Found {} issues", report.issues.len());
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }
    print_rule();
}
