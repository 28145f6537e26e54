use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "lessonkit",
    version,
    about = "Rename, convert, verify and merge course lesson files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Rename(RenameArgs),
    ExtractJson(ExtractJsonArgs),
    Verify(VerifyArgs),
    CheckTitles(CheckTitlesArgs),
    Combine(CombineArgs),
    MigrateExercises(MigrateArgs),
    ExtractPdf(ExtractPdfArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Section {
    A,
    B,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }

    pub fn default_dir(self) -> PathBuf {
        let name = format!("Section {}", self.as_str());
        PathBuf::from(&name).join(&name)
    }
}

#[derive(Args, Debug, Clone)]
pub struct SectionDirArgs {
    #[arg(long, value_enum, default_value_t = Section::B)]
    pub section: Section,

    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl SectionDirArgs {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| self.section.default_dir())
    }
}

#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    #[command(flatten)]
    pub target: SectionDirArgs,

    #[arg(long, default_value = ".docx")]
    pub from: String,

    #[arg(long, default_value = ".json")]
    pub to: String,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractJsonArgs {
    #[command(flatten)]
    pub target: SectionDirArgs,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub target: SectionDirArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckTitlesArgs {
    #[command(flatten)]
    pub target: SectionDirArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CombineArgs {
    #[command(flatten)]
    pub target: SectionDirArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub target: SectionDirArgs,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractPdfArgs {
    #[arg(num_args = 0..)]
    pub paths: Vec<PathBuf>,

    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,
}
