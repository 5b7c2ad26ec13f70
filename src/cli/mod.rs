use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod checks;
mod validate;

#[derive(Parser)]
#[command(
    name = "plugvet",
    version,
    about = "Plugin submission validator"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output format for validation results.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Format {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON array of finding objects
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an extracted plugin submission archive
    Validate {
        /// Directory holding the extracted archive
        archive_dir: PathBuf,

        /// Plugin source code accompanying the submission
        #[arg(long)]
        source: Option<PathBuf>,

        /// Severity policy file (YAML)
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Also report checks that passed, as informational findings
        #[arg(long)]
        report_all: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List registered checks, their requirements, and their finding kinds
    Checks,
}

pub fn run() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Validate {
            archive_dir,
            source,
            policy,
            report_all,
            format,
        } => validate::run(archive_dir, source, policy, report_all, format),
        Commands::Checks => checks::run(),
    }
}
