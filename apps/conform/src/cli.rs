//! CLI argument parsing via `clap`.

use crate::output::OutputMode;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "conform",
    version,
    about = "Guideline-conformance linter",
    long_about = "conform — check a web project tree against a fixed set of coding guidelines.\n\nConfiguration precedence: CLI > conform.toml > defaults.",
    after_help = "Examples:\n  conform check\n  conform check ./app --output json\n  conform check --exclude 'legacy/**' --permissive\n  conform rules",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current conform version.")]
    Version,
    /// Check a project tree
    #[command(
        about = "Run conformance checks",
        long_about = "Classify every file under PATH and apply the applicable guideline rules. Exits 1 when any error-severity rule fails, 2 on fatal errors.",
        after_help = "Examples:\n  conform check\n  conform check ./app --output json"
    )]
    Check {
        #[arg(help = "Project root to scan (default: current dir)")]
        path: Option<String>,
        #[arg(long, value_enum, help = "Output mode (default: human)")]
        output: Option<OutputMode>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Report an empty project as passing instead of failing")]
        permissive: bool,
        #[arg(long, help = "Glob of root-relative paths to skip (repeatable)")]
        exclude: Vec<String>,
        #[arg(long, help = "Path to a conform.toml|yaml (default: discovered)")]
        config: Option<String>,
    },
    /// List active rules
    #[command(
        about = "List rules",
        long_about = "Print the active rules in registration order, after config overrides."
    )]
    Rules {
        #[arg(help = "Project root used for config discovery (default: current dir)")]
        path: Option<String>,
        #[arg(long, value_enum, help = "Output mode (default: human)")]
        output: Option<OutputMode>,
        #[arg(long, help = "Path to a conform.toml|yaml (default: discovered)")]
        config: Option<String>,
    },
}
