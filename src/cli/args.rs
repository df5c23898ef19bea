//! CLI argument definitions
//!
//! All Clap derive structs for `pqcsim` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;
use crate::phase::{DataSize, PqcComplexity};

// ============================================================================
// Root CLI
// ============================================================================

/// Visual simulation of a post-quantum secured genomic risk scoring pipeline.
#[derive(Parser, Debug)]
#[command(name = "pqcsim", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "PQCSIM_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "PQCSIM_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate a pipeline run and render its progress.
    Run(RunArgs),

    /// List the phase catalog.
    Phases(PhasesArgs),

    /// Show the tick interval for run parameters.
    Interval(IntervalArgs),

    /// Validate configuration files.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "PQCSIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data size class (defaults to the config file, then `medium`).
    #[arg(short, long, env = "PQCSIM_DATA_SIZE")]
    pub data_size: Option<DataSize>,

    /// PQC complexity class (defaults to the config file, then `standard`).
    #[arg(short, long, env = "PQCSIM_PQC_COMPLEXITY")]
    pub pqc_complexity: Option<PqcComplexity>,

    /// Override the base tick period (e.g. `50ms`, `2s`).
    #[arg(long, value_parser = humantime::parse_duration)]
    pub base_interval: Option<Duration>,

    /// Seed for the result artifact generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Write JSONL events to this file (`-` for stderr).
    #[arg(long, env = "PQCSIM_EVENTS")]
    pub events: Option<PathBuf>,

    /// Expose Prometheus metrics on `127.0.0.1:<port>`.
    #[arg(long, env = "PQCSIM_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Treat configuration warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `phases`.
#[derive(Args, Debug)]
pub struct PhasesArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "PQCSIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `interval`.
#[derive(Args, Debug)]
pub struct IntervalArgs {
    /// Data size class; all classes when omitted.
    #[arg(short, long)]
    pub data_size: Option<DataSize>,

    /// PQC complexity class; all classes when omitted.
    #[arg(short, long)]
    pub pqc_complexity: Option<PqcComplexity>,

    /// Override the base tick period (e.g. `50ms`, `2s`).
    #[arg(long, value_parser = humantime::parse_duration)]
    pub base_interval: Option<Duration>,

    /// Path to YAML configuration file.
    #[arg(short, long, env = "PQCSIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
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

/// Output format for structured output.
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_params() {
        let cli = Cli::try_parse_from([
            "pqcsim",
            "run",
            "--data-size",
            "large",
            "--pqc-complexity",
            "paranoid",
            "--base-interval",
            "50ms",
            "--seed",
            "9",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.data_size, Some(DataSize::Large));
        assert_eq!(args.pqc_complexity, Some(PqcComplexity::Paranoid));
        assert_eq!(args.base_interval, Some(Duration::from_millis(50)));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.format, OutputFormat::Human);
    }

    #[test]
    fn test_rejects_unknown_data_size() {
        let result = Cli::try_parse_from(["pqcsim", "run", "--data-size", "huge"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["pqcsim", "phases", "-vv", "--quiet", "--color", "never"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.log_format, LogFormat::Human);
    }

    #[test]
    fn test_validate_requires_files() {
        assert!(Cli::try_parse_from(["pqcsim", "validate"]).is_err());
    }
}
