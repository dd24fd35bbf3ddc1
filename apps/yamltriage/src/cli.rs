//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "yamltriage",
    version,
    about = "Classify YAML parse failures and apply targeted repairs",
    long_about = "yamltriage — validate a directory of YAML documents, bucket parse failures by error pattern, and apply conservative pattern-specific fixes.\n\nConfiguration precedence: CLI > yamltriage.toml > defaults.",
    after_help = "Examples:\n  yamltriage validate --root data/entries\n  yamltriage fix --root data/entries --check\n  yamltriage fix --root data/entries --write --report-dir reports",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Clone)]
/// Options shared by `validate` and `fix`.
pub struct CommonArgs {
    #[arg(long, help = "Repository root used for config discovery (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, help = "Directory of YAML documents (default: config root or repo root)")]
    pub root: Option<String>,
    #[arg(long, help = "File or directory name to skip; repeatable")]
    pub exclude: Vec<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, help = "Write JSON report artifacts into this directory")]
    pub report_dir: Option<String>,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current yamltriage version.")]
    Version,
    /// Validate documents and bucket failures
    #[command(
        about = "Validate and classify",
        long_about = "Parse every document, classify failures into error patterns, and report counts and examples. Exits non-zero when any document fails.",
        after_help = "Examples:\n  yamltriage validate --root data\n  yamltriage validate --root data --exclude seed.yaml --output json"
    )]
    Validate {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Apply targeted fixes to failing documents
    #[command(
        about = "Apply targeted fixes",
        long_about = "Validate, classify, then run the registered fix for each failing document's pattern. Without --write, fixes are previewed only. When --check is set, write is disabled.",
        after_help = "Examples:\n  yamltriage fix --root data\n  yamltriage fix --root data --write\n  yamltriage fix --root data --check"
    )]
    Fix {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Write fixed content back to files")]
        write: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero if fixes would apply (implies write=false)")]
        check: bool,
    },
}
