mod cli;
mod commands;
mod docx;
mod model;
mod syllabus;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rename(args) => commands::rename::run(args),
        Commands::ExtractJson(args) => commands::extract_json::run(args),
        Commands::Verify(args) => commands::verify::run(args),
        Commands::CheckTitles(args) => commands::titles::run(args),
        Commands::Combine(args) => commands::combine::run(args),
        Commands::MigrateExercises(args) => commands::migrate::run(args),
        Commands::ExtractPdf(args) => commands::extract_pdf::run(args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
