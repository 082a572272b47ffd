//! CLI argument definitions
//!
//! All Clap derive structs for `classtab` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Insert class summary tables into rendered API documentation.
#[derive(Parser, Debug)]
#[command(name = "classtab", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "CLASSTAB_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert summary tables into HTML pages.
    Apply(ApplyArgs),

    /// Show the summary tables one page would receive.
    Inspect(InspectArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

/// Arguments for `apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// HTML files or directories (searched recursively for `*.html`).
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Path to YAML configuration file.
    #[arg(short, long, env = "CLASSTAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write results under this directory instead of in place.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Process pages without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Report format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Fail when any member is skipped or any table cannot be inserted.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// HTML page to inspect.
    pub file: PathBuf,

    /// Path to YAML configuration file.
    #[arg(short, long, env = "CLASSTAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell.
    pub shell: Shell,
}

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}
