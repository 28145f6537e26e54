use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{error, info};

use crate::cli::MigrateArgs;
use crate::util::{display_file_name, list_matching_files, write_json_pretty};

const REVERSE_SCENARIO: &str = "reverse-scenario";

pub fn run(args: MigrateArgs) -> Result<()> {
    let dir = args.target.resolved_dir();
    let files = list_matching_files(&dir, "*.json")?;

    let mut updated_files = 0_usize;
    for path in &files {
        match migrate_file(path, args.dry_run) {
            Ok(0) => {}
            Ok(modified) => {
                println!(
                    "Updating {}: Modified {} exercises.",
                    display_file_name(path),
                    modified
                );
                updated_files += 1;
            }
            Err(err) => {
                error!(file = %path.display(), error = %format!("{err:#}"), "failed to migrate file");
            }
        }
    }

    info!(
        scanned = files.len(),
        updated = updated_files,
        dry_run = args.dry_run,
        "exercise migration complete"
    );
    println!(
        "Bulk update for Section {} complete.",
        args.target.section.as_str()
    );

    Ok(())
}

fn migrate_file(path: &Path, dry_run: bool) -> Result<usize> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut value: Value = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let modified = migrate_exercises(&mut value);
    if modified > 0 && !dry_run {
        write_json_pretty(path, &value)?;
    }

    Ok(modified)
}

pub fn migrate_exercises(value: &mut Value) -> usize {
    match value {
        Value::Object(map) => {
            let mut modified = 0;

            let is_reverse_scenario =
                map.get("type").and_then(Value::as_str) == Some(REVERSE_SCENARIO);
            let has_answer = map
                .get("answer")
                .and_then(Value::as_str)
                .is_some_and(|answer| !answer.is_empty());

            if is_reverse_scenario && has_answer {
                if let Some(answer) = map.shift_remove("answer") {
                    map.insert("scene".to_string(), answer);
                    modified += 1;
                }
            }

            for child in map.values_mut() {
                modified += migrate_exercises(child);
            }
            modified
        }
        Value::Array(items) => items.iter_mut().map(migrate_exercises).sum(),
        _ => 0,
    }
}
