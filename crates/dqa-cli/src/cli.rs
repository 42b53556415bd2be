//! CLI argument definitions for the message validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dqa",
    version,
    about = "Data-quality checks for HL7 immunization update messages",
    long_about = "Validate parsed HL7 v2 VXU messages against immunization registry rules.\n\n\
                  Every coded value is resolved against the reference tables and each\n\
                  finding is reported with its field, position and severity."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate one parsed message (JSON) and report its issues.
    Validate(ValidateArgs),

    /// List the issue catalog.
    Issues(IssuesArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the parsed message as JSON.
    #[arg(value_name = "MESSAGE.json")]
    pub message: PathBuf,

    /// Reference-data directory (default: $DQA_STANDARDS_DIR or the shipped set).
    #[arg(long = "standards", value_name = "DIR")]
    pub standards: Option<PathBuf>,

    /// Validator options (TOML): score weights, thresholds, severity overrides.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Submitter profile whose code cache is used.
    #[arg(long = "profile", value_name = "ID", default_value_t = 1)]
    pub profile: u64,

    /// Receipt timestamp (RFC 3339), replacing the one in the message.
    #[arg(long = "received", value_name = "TIMESTAMP")]
    pub received: Option<String>,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,
}

#[derive(Parser)]
pub struct IssuesArgs {
    /// List message fields and their code tables instead of issue types.
    #[arg(long = "fields")]
    pub fields: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
