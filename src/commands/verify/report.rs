use std::collections::HashMap;

use crate::model::{OrderMismatch, PositionOutcome, VerificationResult};
use crate::syllabus::SectionProfile;
use crate::util::{print_banner, print_rule};

pub fn print_report(profile: &SectionProfile, result: &VerificationResult) {
    print_banner(&format!(
        "SECTION {} VERIFICATION REPORT",
        profile.section.as_str()
    ));

    println!("[FILE COUNT]");
    println!("   Expected: {} files", result.expected_count);
    println!("   Found:    {} files", result.actual_count);
    println!("   Status:   {}", pass_fail(result.count_matches()));
    println!();

    print_completeness(result);
    print_syllabus(profile, result);
    print_critical_checks(result);

    print_rule();
    if result.passed() {
        println!(
            "RESULT: Section {} is complete with all {} lesson files!",
            profile.section.as_str(),
            result.expected_count
        );
    } else {
        println!("RESULT: Issues found. Please review the report above.");
    }
    print_rule();
}

fn pass_fail(ok: bool) -> &'static str {
    if ok { "PASS" } else { "FAIL" }
}

fn print_completeness(result: &VerificationResult) {
    println!("[COMPLETENESS CHECK]");
    if result.missing.is_empty() && result.extra.is_empty() {
        println!("   [OK] All expected files are present and no extra files found");
    }
    if !result.missing.is_empty() {
        println!("   [MISSING FILES] ({}):", result.missing.len());
        for name in &result.missing {
            println!("      - {name}");
        }
    }
    if !result.extra.is_empty() {
        println!("   [UNEXPECTED FILES] ({}):", result.extra.len());
        for name in &result.extra {
            println!("      - {name}");
        }
    }
    println!();
}

fn print_syllabus(profile: &SectionProfile, result: &VerificationResult) {
    println!("[SYLLABUS VERIFICATION]");
    println!();

    let mismatches = result
        .order_mismatches
        .iter()
        .map(|mismatch| (mismatch.index, mismatch))
        .collect::<HashMap<usize, &OrderMismatch>>();

    let mut index = 0;
    for lesson in &profile.lessons {
        match lesson.title {
            Some(title) => println!("Unit {} - Lesson {}: {}", lesson.unit(), lesson.id, title),
            None => println!("Unit {} - Lesson {}", lesson.unit(), lesson.id),
        }

        for subpart in &lesson.subparts {
            let expected_name = lesson.filename(subpart);
            match mismatches.get(&index) {
                None => println!("   [OK] {expected_name}"),
                Some(OrderMismatch {
                    actual: Some(actual),
                    ..
                }) => {
                    println!("   [FAIL] Expected: {expected_name}");
                    println!("          Got:      {actual}");
                }
                Some(OrderMismatch { actual: None, .. }) => {
                    println!("   [MISSING] {expected_name}");
                }
            }
            index += 1;
        }
        println!();
    }
}

fn print_critical_checks(result: &VerificationResult) {
    if result.positional_checks.is_empty() && result.subpart_checks.is_empty() {
        return;
    }

    println!("[CRITICAL CHECKS]");
    println!();

    for check in &result.positional_checks {
        let label = describe(&check.lesson_id, check.title.as_deref());
        match check.outcome {
            PositionOutcome::Pass => println!("   [OK] {label} is in correct position"),
            PositionOutcome::WrongPosition { found_index } => println!(
                "   [FAIL] {} position incorrect (found at index {}, expected {})",
                check.lesson_id, found_index, check.expected_index
            ),
            PositionOutcome::NotFound => println!("   [FAIL] {} files not found", check.lesson_id),
        }
    }

    for check in &result.subpart_checks {
        let label = describe(&check.lesson_id, check.title.as_deref());
        if check.passed() {
            println!("   [OK] {label} has all {} parts", check.expected);
        } else {
            println!(
                "   [FAIL] {} should have {} parts, found {}",
                check.lesson_id, check.expected, check.found
            );
        }
    }

    println!();
}

fn describe(lesson_id: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("{lesson_id} '{title}'"),
        None => lesson_id.to_string(),
    }
}
