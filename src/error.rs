//! Error types for `roku-deploy`
//!
//! Domain errors for configuration loading and device selection, the
//! aggregated top-level error, and the process exit-code table.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::codes::ErrorCode;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `roku-deploy` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (unreadable, unparsable, or failed validation)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// No usable device could be reached
    pub const DEVICE_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `roku-deploy` operations.
#[derive(Debug, Error)]
pub enum RokuDeployError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Device selection error
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RokuDeployError {
    /// Returns the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Device(_) => ExitCode::DEVICE_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML/JSON parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration file not found or unreadable
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set ({location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Message attached to the `${VAR:?message}` reference
        location: String,
    },

    /// The configuration failed schema validation
    #[error("{path} is invalid ({} problem(s))", .codes.len())]
    Invalid {
        /// Path to the configuration file
        path: String,
        /// Error codes reported by the validator
        codes: Vec<ErrorCode>,
    },

    /// A device id was requested that the configuration does not define
    #[error("unknown device '{name}'{}", did_you_mean(.suggestion.as_deref()))]
    UnknownDevice {
        /// The requested device id
        name: String,
        /// Closest configured device id, if any is close enough
        suggestion: Option<String>,
    },

    /// No device was requested and `devices.default` is unusable
    #[error("no device requested and devices.default is not set")]
    MissingDefault,
}

fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
}

// ============================================================================
// Device Errors
// ============================================================================

/// Device selection failures.
///
/// Both variants are terminal for the current run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeviceError {
    /// The explicitly requested device did not answer; fallback is suppressed.
    #[error("requested device {ip} is unreachable")]
    RequestedUnreachable {
        /// Address of the requested device
        ip: String,
    },

    /// Neither the current device nor any configured device answered.
    #[error("no configured device is reachable (tried {})", .tried.join(", "))]
    NoneReachable {
        /// Every address that was probed, in probe order
        tried: Vec<String>,
    },
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `roku-deploy` operations.
pub type Result<T> = std::result::Result<T, RokuDeployError>;

// ============================================================================
// Tests
// ============================================================================
