use std::collections::BTreeSet;

use crate::model::{
    ActualFile, OrderMismatch, PositionOutcome, PositionalCheck, SubpartCountCheck,
    VerificationResult,
};
use crate::syllabus::{PositionRule, SectionProfile, SubpartRule};

// Runs every manifest check against a listing of filenames. The listing is sorted here,
// so callers may pass names in directory order.
pub fn verify_listing(profile: &SectionProfile, mut names: Vec<String>) -> VerificationResult {
    names.sort();

    let expected = profile
        .manifest()
        .into_iter()
        .map(|entry| entry.filename)
        .collect::<Vec<String>>();
    let actual = names
        .iter()
        .map(|name| ActualFile::from_name(name.as_str()))
        .collect::<Vec<ActualFile>>();

    let (missing, extra) = completeness(&expected, &names);

    VerificationResult {
        expected_count: expected.len(),
        actual_count: names.len(),
        missing,
        extra,
        order_mismatches: sequential_mismatches(&expected, &names),
        positional_checks: profile
            .position_rules
            .iter()
            .map(|rule| positional_check(profile, rule, &actual))
            .collect(),
        subpart_checks: profile
            .subpart_rules
            .iter()
            .map(|rule| subpart_check(profile, rule, &actual))
            .collect(),
    }
}

fn completeness(expected: &[String], actual: &[String]) -> (BTreeSet<String>, BTreeSet<String>) {
    let expected_set = expected.iter().cloned().collect::<BTreeSet<String>>();
    let actual_set = actual.iter().cloned().collect::<BTreeSet<String>>();

    let missing = expected_set.difference(&actual_set).cloned().collect();
    let extra = actual_set.difference(&expected_set).cloned().collect();
    (missing, extra)
}

// Lock-step positional comparison. One inserted or removed file shifts every later
// position, so a single divergence cascades into many mismatches.
pub fn sequential_mismatches(expected: &[String], sorted_actual: &[String]) -> Vec<OrderMismatch> {
    expected
        .iter()
        .enumerate()
        .filter_map(|(index, expected_name)| match sorted_actual.get(index) {
            Some(actual_name) if actual_name == expected_name => None,
            actual_name => Some(OrderMismatch {
                index,
                expected: expected_name.clone(),
                actual: actual_name.cloned(),
            }),
        })
        .collect()
}

fn positional_check(
    profile: &SectionProfile,
    rule: &PositionRule,
    sorted_actual: &[ActualFile],
) -> PositionalCheck {
    let found = sorted_actual
        .iter()
        .position(|file| file.parsed_id.as_deref() == Some(rule.lesson_id));

    let outcome = match found {
        None => PositionOutcome::NotFound,
        Some(index) if index == rule.index => PositionOutcome::Pass,
        Some(found_index) => PositionOutcome::WrongPosition { found_index },
    };

    PositionalCheck {
        lesson_id: rule.lesson_id.to_string(),
        title: profile.expected_title(rule.lesson_id).map(ToOwned::to_owned),
        expected_index: rule.index,
        outcome,
    }
}

fn subpart_check(
    profile: &SectionProfile,
    rule: &SubpartRule,
    actual: &[ActualFile],
) -> SubpartCountCheck {
    let found = actual
        .iter()
        .filter(|file| file.parsed_id.as_deref() == Some(rule.lesson_id))
        .count();

    SubpartCountCheck {
        lesson_id: rule.lesson_id.to_string(),
        title: profile.expected_title(rule.lesson_id).map(ToOwned::to_owned),
        expected: rule.count,
        found,
    }
}
