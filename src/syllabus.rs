use crate::cli::Section;
use crate::model::{LessonSpec, ManifestEntry};

const SECTION_B_LESSONS: [(&str, &str); 25] = [
    ("B1-1", "Pacing and Leading"),
    ("B1-2", "Embedded Commands"),
    ("B1-3", "The Double Bind"),
    ("B1-4", "The Milton Model"),
    ("B1-5", "Review: The Hypnotist"),
    ("B2-1", "Framing 101"),
    ("B2-2", "Anchoring"),
    ("B2-3", "Contrast Principle"),
    ("B2-4", "Labeling & Altercasting"),
    ("B2-5", "Review: The Architect"),
    ("B3-1", "Social Proof"),
    ("B3-2", "Authority Hack"),
    ("B3-3", "Pretexting & Phishing"),
    ("B3-4", "Liking Bias"),
    ("B3-5", "Review: The Engineer"),
    ("B4-1", "Scarcity"),
    ("B4-2", "Reciprocity"),
    ("B4-3", "Fear-Mongering"),
    ("B4-4", "Hope-Mongering"),
    ("B4-5", "Review: The Lever"),
    ("B5-1", "Language & Framing Review"),
    ("B5-2", "Social & Emotional Levers Review"),
    ("B5-3", "Salesman Simulation"),
    ("B5-4", "Politician Simulation"),
    ("B5-5", "Section B Boss Fight"),
];

const UNITS_PER_SECTION: u32 = 5;
const LESSONS_PER_UNIT: u32 = 5;
const PARTS_PER_LESSON: u32 = 3;

// Ninth lesson of section B: 8 lessons x 3 parts precede it.
const B2_4_INDEX: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRule {
    pub lesson_id: &'static str,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubpartRule {
    pub lesson_id: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct SectionProfile {
    pub section: Section,
    pub lessons: Vec<LessonSpec>,
    pub position_rules: Vec<PositionRule>,
    pub subpart_rules: Vec<SubpartRule>,
}

impl SectionProfile {
    pub fn for_section(section: Section) -> Self {
        match section {
            Section::A => Self {
                section,
                lessons: generated_lessons("A"),
                position_rules: Vec::new(),
                subpart_rules: Vec::new(),
            },
            Section::B => Self {
                section,
                lessons: SECTION_B_LESSONS
                    .iter()
                    .map(|(id, title)| LessonSpec {
                        id: (*id).to_string(),
                        title: Some(*title),
                        subparts: standard_subparts(),
                    })
                    .collect(),
                position_rules: vec![PositionRule {
                    lesson_id: "B2-4",
                    index: B2_4_INDEX,
                }],
                subpart_rules: vec![SubpartRule {
                    lesson_id: "B3-3",
                    count: 3,
                }],
            },
        }
    }

    pub fn glob(&self) -> String {
        format!("Lesson_{}*.json", self.section.as_str())
    }

    pub fn manifest(&self) -> Vec<ManifestEntry> {
        self.lessons
            .iter()
            .flat_map(|lesson| {
                lesson.subparts.iter().map(|subpart| ManifestEntry {
                    lesson_id: lesson.id.clone(),
                    subpart: subpart.clone(),
                    filename: lesson.filename(subpart),
                })
            })
            .collect()
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&LessonSpec> {
        self.lessons.iter().find(|lesson| lesson.id == lesson_id)
    }

    pub fn expected_title(&self, lesson_id: &str) -> Option<&'static str> {
        self.lesson(lesson_id).and_then(|lesson| lesson.title)
    }

    pub fn has_titles(&self) -> bool {
        self.lessons.iter().any(|lesson| lesson.title.is_some())
    }
}

fn standard_subparts() -> Vec<String> {
    (1..=PARTS_PER_LESSON)
        .map(|part| format!("Part_{part}"))
        .collect()
}

fn generated_lessons(letter: &str) -> Vec<LessonSpec> {
    let mut lessons = Vec::new();
    for unit in 1..=UNITS_PER_SECTION {
        for lesson in 1..=LESSONS_PER_UNIT {
            lessons.push(LessonSpec {
                id: format!("{letter}{unit}-{lesson}"),
                title: None,
                subparts: standard_subparts(),
            });
        }
    }
    lessons
}
