use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::VerifyArgs;
use crate::model::{VerificationReport, VerificationResult};
use crate::syllabus::SectionProfile;
use crate::util::{file_name_string, list_matching_files_or_empty, now_utc_string};

mod checks;
mod report;
#[cfg(test)]
mod tests;

pub use self::checks::verify_listing;
use self::report::print_report;

pub fn run(args: VerifyArgs) -> Result<()> {
    let profile = SectionProfile::for_section(args.target.section);
    let dir = args.target.resolved_dir();

    info!(
        section = profile.section.as_str(),
        dir = %dir.display(),
        "verifying lesson manifest"
    );

    let result = verify_directory(&profile, &dir);

    info!(
        expected = result.expected_count,
        found = result.actual_count,
        order_mismatches = result.order_mismatches.len(),
        passed = result.passed(),
        "verification complete"
    );

    if args.json {
        let report = VerificationReport {
            generated_at: now_utc_string(),
            section: profile.section.as_str().to_string(),
            directory: dir.display().to_string(),
            passed: result.passed(),
            result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&profile, &result);
    }

    Ok(())
}

pub fn verify_directory(profile: &SectionProfile, dir: &Path) -> VerificationResult {
    let names = list_matching_files_or_empty(dir, &profile.glob())
        .iter()
        .filter_map(|path| match file_name_string(path) {
            Ok(name) => Some(name),
            Err(err) => {
                warn!(error = %err, "skipping file");
                None
            }
        })
        .collect::<Vec<String>>();

    verify_listing(profile, names)
}
