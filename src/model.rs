use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonSpec {
    pub id: String,
    pub title: Option<&'static str>,
    pub subparts: Vec<String>,
}

impl LessonSpec {
    pub fn unit(&self) -> &str {
        self.id.split('-').next().unwrap_or(&self.id)
    }

    pub fn filename(&self, subpart: &str) -> String {
        format!("Lesson_{}_{}.json", self.id, subpart)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub lesson_id: String,
    pub subpart: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActualFile {
    pub name: String,
    pub parsed_id: Option<String>,
}

impl ActualFile {
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let parsed_id = parse_lesson_id(&name);
        Self { name, parsed_id }
    }
}

pub fn parse_lesson_id(name: &str) -> Option<String> {
    let stem = Path::new(name).file_stem()?.to_str()?;
    stem.split('_').nth(1).map(ToOwned::to_owned)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderMismatch {
    pub index: usize,
    pub expected: String,
    pub actual: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PositionOutcome {
    Pass,
    WrongPosition { found_index: usize },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionalCheck {
    pub lesson_id: String,
    pub title: Option<String>,
    pub expected_index: usize,
    pub outcome: PositionOutcome,
}

impl PositionalCheck {
    pub fn passed(&self) -> bool {
        self.outcome == PositionOutcome::Pass
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubpartCountCheck {
    pub lesson_id: String,
    pub title: Option<String>,
    pub expected: usize,
    pub found: usize,
}

impl SubpartCountCheck {
    pub fn passed(&self) -> bool {
        self.expected == self.found
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub expected_count: usize,
    pub actual_count: usize,
    pub missing: BTreeSet<String>,
    pub extra: BTreeSet<String>,
    pub order_mismatches: Vec<OrderMismatch>,
    pub positional_checks: Vec<PositionalCheck>,
    pub subpart_checks: Vec<SubpartCountCheck>,
}

impl VerificationResult {
    pub fn count_matches(&self) -> bool {
        self.expected_count == self.actual_count
    }

    pub fn passed(&self) -> bool {
        self.count_matches()
            && self.missing.is_empty()
            && self.extra.is_empty()
            && self.order_mismatches.is_empty()
            && self.positional_checks.iter().all(PositionalCheck::passed)
            && self.subpart_checks.iter().all(SubpartCountCheck::passed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub generated_at: String,
    pub section: String,
    pub directory: String,
    pub passed: bool,
    pub result: VerificationResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TitleOutcome {
    Ok { actual: String },
    Mismatch { expected: String, actual: String },
    NotValidJson,
    NoTitleField { expected: String, found_in_content: bool },
    NoExpectedTitle,
    ReadError { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonTitleResult {
    pub lesson_id: String,
    pub file: String,
    pub outcome: TitleOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitleReport {
    pub lessons: Vec<LessonTitleResult>,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    pub page: usize,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageImage {
    pub page: usize,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PdfExtraction {
    pub text: Vec<PageText>,
    pub images: Vec<PageImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionPayload {
    Success(PdfExtraction),
    Error { error: String },
}
