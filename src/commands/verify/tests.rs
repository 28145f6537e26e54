use std::fs;

use super::checks::sequential_mismatches;
use super::*;
use crate::cli::Section;
use crate::model::PositionOutcome;

fn manifest_names(profile: &SectionProfile) -> Vec<String> {
    profile
        .manifest()
        .into_iter()
        .map(|entry| entry.filename)
        .collect()
}

#[test]
fn exact_manifest_passes_every_check() {
    let profile = SectionProfile::for_section(Section::B);
    let mut names = manifest_names(&profile);
    names.reverse();

    let result = verify_listing(&profile, names);

    assert_eq!(result.expected_count, 75);
    assert_eq!(result.actual_count, 75);
    assert!(result.missing.is_empty());
    assert!(result.extra.is_empty());
    assert!(result.order_mismatches.is_empty());
    assert!(result.positional_checks.iter().all(|check| check.passed()));
    assert!(result.subpart_checks.iter().all(|check| check.passed()));
    assert!(result.passed());
}

#[test]
fn removing_a_middle_file_cascades_order_mismatches() {
    let profile = SectionProfile::for_section(Section::B);
    let mut names = manifest_names(&profile);
    let removed = names.remove(40);

    let result = verify_listing(&profile, names);

    assert_eq!(result.actual_count, result.expected_count - 1);
    assert!(!result.count_matches());
    assert!(result.missing.contains(&removed));
    assert!(result.extra.is_empty());
    assert_eq!(result.order_mismatches.first().map(|m| m.index), Some(40));
    assert_eq!(result.order_mismatches.len(), 75 - 40);

    let last = result.order_mismatches.last().expect("tail mismatch");
    assert_eq!(last.index, 74);
    assert_eq!(last.actual, None);
    assert!(!result.passed());
}

#[test]
fn comparison_continues_after_a_mismatch() {
    let expected = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let actual = vec!["a".to_string(), "x".to_string(), "c".to_string()];

    let mismatches = sequential_mismatches(&expected, &actual);

    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].index, 1);
    assert_eq!(mismatches[0].expected, "b");
    assert_eq!(mismatches[0].actual.as_deref(), Some("x"));
}

#[test]
fn b2_4_position_check_reports_found_index_when_shifted() {
    let profile = SectionProfile::for_section(Section::B);
    let mut names = manifest_names(&profile);
    names.insert(0, "Lesson_B1-0_Part_1.json".to_string());

    let result = verify_listing(&profile, names);
    let check = &result.positional_checks[0];

    assert_eq!(check.lesson_id, "B2-4");
    assert_eq!(check.expected_index, 24);
    assert_eq!(check.outcome, PositionOutcome::WrongPosition { found_index: 25 });
    assert!(result.extra.contains("Lesson_B1-0_Part_1.json"));
}

#[test]
fn b2_4_position_check_passes_at_index_24() {
    let profile = SectionProfile::for_section(Section::B);
    let names = manifest_names(&profile);
    assert_eq!(names[24], "Lesson_B2-4_Part_1.json");

    let result = verify_listing(&profile, names);
    assert_eq!(result.positional_checks[0].outcome, PositionOutcome::Pass);
}

#[test]
fn b2_4_position_check_distinguishes_not_found() {
    let profile = SectionProfile::for_section(Section::B);
    let names = manifest_names(&profile)
        .into_iter()
        .filter(|name| !name.starts_with("Lesson_B2-4_"))
        .collect::<Vec<String>>();

    let result = verify_listing(&profile, names);
    assert_eq!(result.positional_checks[0].outcome, PositionOutcome::NotFound);
}

#[test]
fn b3_3_subpart_count_uses_parsed_ids() {
    let profile = SectionProfile::for_section(Section::B);
    let names = manifest_names(&profile)
        .into_iter()
        .filter(|name| name != "Lesson_B3-3_Part_2.json")
        .collect::<Vec<String>>();

    let result = verify_listing(&profile, names);
    let check = &result.subpart_checks[0];

    assert_eq!(check.lesson_id, "B3-3");
    assert_eq!(check.expected, 3);
    assert_eq!(check.found, 2);
    assert!(!check.passed());
}

#[test]
fn section_a_count_check_reports_expected_and_found() {
    let profile = SectionProfile::for_section(Section::A);
    let full = manifest_names(&profile);

    let result = verify_listing(&profile, full.clone());
    assert!(result.count_matches());
    assert!(result.passed());
    assert!(result.positional_checks.is_empty());

    let mut short = full;
    short.pop();
    let result = verify_listing(&profile, short);
    assert_eq!(result.expected_count, 75);
    assert_eq!(result.actual_count, 74);
    assert!(!result.count_matches());
    assert!(result.missing.contains("Lesson_A5-5_Part_3.json"));
}

#[test]
fn verify_directory_reads_only_matching_files() {
    let profile = SectionProfile::for_section(Section::B);
    let dir = tempfile::tempdir().expect("tempdir");
    for name in manifest_names(&profile) {
        fs::write(dir.path().join(name), "{}").expect("write lesson");
    }
    fs::write(dir.path().join("All section b.docx"), "combined").expect("write extra");
    fs::write(dir.path().join("Lesson_A1-1_Part_1.json"), "{}").expect("write other section");

    let result = verify_directory(&profile, dir.path());

    assert!(result.passed());
    assert_eq!(result.actual_count, 75);
}

#[test]
fn missing_directory_still_produces_a_failing_report() {
    let profile = SectionProfile::for_section(Section::B);
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("does-not-exist");

    let result = verify_directory(&profile, &missing);

    assert_eq!(result.expected_count, 75);
    assert_eq!(result.actual_count, 0);
    assert_eq!(result.missing.len(), 75);
    assert_eq!(result.order_mismatches.len(), 75);
    assert!(result.order_mismatches.iter().all(|m| m.actual.is_none()));
    assert_eq!(result.positional_checks[0].outcome, PositionOutcome::NotFound);
    assert!(!result.passed());
}
