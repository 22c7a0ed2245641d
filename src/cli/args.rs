//! CLI argument definitions
//!
//! All Clap derive structs for `roku-deploy` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::options::Mode;

// ============================================================================
// Root CLI
// ============================================================================

/// Validate Roku deploy configuration and pick a reachable device.
#[derive(Parser, Debug)]
#[command(name = "roku-deploy", author, version, about)]
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
    #[arg(long, default_value = "auto", global = true, env = "ROKU_DEPLOY_COLOR")]
    pub color: ColorChoice,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration files and report every problem found.
    Validate(ValidateArgs),

    /// Pick a reachable device, falling back across configured devices.
    Select(SelectArgs),

    /// List the validation error codes and their messages.
    Codes(CodesArgs),

    /// Display version information.
    Version(VersionArgs),
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
}

/// Arguments for `select`.
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Path to the configuration file [default: ~/.roku_config.json].
    #[arg(short, long, env = "ROKU_DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Device id to use; disables fallback to other devices.
    #[arg(short, long)]
    pub device: Option<String>,

    /// Operation the device is needed for.
    #[arg(short, long, default_value = "sideload")]
    pub mode: Mode,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `codes`.
#[derive(Args, Debug)]
pub struct CodesArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
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

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

// ============================================================================
// Tests
// ============================================================================
