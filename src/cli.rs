use clap::{Args, Parser, Subcommand};
use skill_validator::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skill-validator",
    version,
    about = "Static security audit for AI agent skills"
)]
pub struct Cli {
    /// Log scan progress to stderr (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a skill directory for security issues
    Scan {
        /// Path to the skill directory
        path: PathBuf,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: ScanOptions,
    },

    /// Scan every skill directory inside a collection directory
    #[command(name = "scan-all")]
    ScanAll {
        /// Path to a directory containing multiple skill subdirectories
        path: PathBuf,

        #[command(flatten)]
        options: ScanOptions,
    },

    /// List all built-in rules
    ListRules,

    /// Show the description and pattern of a rule
    Explain {
        /// Rule identifier (e.g. shell/pipe-curl-bash)
        rule_id: String,
    },
}

/// Flags shared by `scan` and `scan-all`.
#[derive(Args)]
pub struct ScanOptions {
    /// Output format
    #[arg(long, short, default_value = "pretty", value_enum)]
    pub format: OutputFormat,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,

    /// Also run the prompt-injection and data-privacy rules
    #[arg(long)]
    pub ai_scan: bool,

    /// Do not honor the skill's own .scanignore (recommended for untrusted skills)
    #[arg(long)]
    pub no_scanignore: bool,

    /// Custom config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}
