//! Logging initialization.
//!
//! Diagnostics go to stderr so stdout stays reserved for command output
//! (device ips, validation messages, JSON reports). `ROKU_DEPLOY_LOG_LEVEL`
//! overrides the `-v` count and `ROKU_DEPLOY_LOG_FORMAT=json` switches to
//! newline-delimited JSON.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

const LEVEL_ENV: &str = "ROKU_DEPLOY_LOG_LEVEL";
const FORMAT_ENV: &str = "ROKU_DEPLOY_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl LogFormat {
    /// Reads `ROKU_DEPLOY_LOG_FORMAT`, falling back to human output.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(FORMAT_ENV)
            .map_or(Self::Human, |value| Self::parse(&value))
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Human
        }
    }
}

/// Tracing directive for a `-v` count: warnings only by default, so a
/// fallback to another device is always visible.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn wants_ansi(color: ColorChoice, is_terminal: bool) -> bool {
    match color {
        ColorChoice::Auto => is_terminal && std::env::var_os("NO_COLOR").is_none(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env(LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Human => builder
            .with_ansi(wants_ansi(color, std::io::stderr().is_terminal()))
            .try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
