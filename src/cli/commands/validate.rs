//! `validate` command.
//!
//! Loads and validates each file, printing the catalog message for every
//! reported code. A file that cannot be loaded is reported and skipped; all
//! files are checked before the first failure is returned.

use serde_json::json;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoadWarning, ValidationResult, Validator};
use crate::error::{ConfigError, RokuDeployError};

/// Outcome for one file on the command line.
enum FileReport {
    Loaded(ValidationResult),
    Failed(String),
}

/// Validate every file named on the command line.
///
/// # Errors
///
/// Returns the first failure in argument order: the load error of a file
/// that could not be read or parsed, or [`ConfigError::Invalid`] for a
/// file that fails validation.
pub fn run(args: &ValidateArgs) -> Result<(), RokuDeployError> {
    let loader = ConfigLoader::with_defaults();
    let mut validator = Validator::new();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_failure: Option<ConfigError> = None;

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let display = path.display().to_string();

        let load_result = match loader.load(path) {
            Ok(load_result) => load_result,
            Err(err) => {
                reports.push((display, FileReport::Failed(err.to_string())));
                first_failure.get_or_insert(err);
                continue;
            }
        };
        log_load_warnings(&load_result.warnings);

        let result = validator.validate(&load_result.config);
        for warning in &result.warnings {
            tracing::warn!(path = %warning.path, "{}", warning.message);
        }

        if result.has_errors() && first_failure.is_none() {
            first_failure = Some(ConfigError::Invalid {
                path: display.clone(),
                codes: result.codes.clone(),
            });
        }
        reports.push((display, FileReport::Loaded(result)));
    }

    match args.format {
        OutputFormat::Human => {
            for (path, report) in &reports {
                match report {
                    FileReport::Loaded(result) => print_human(path, result),
                    FileReport::Failed(message) => println!("{path}: {message}"),
                }
            }
        }
        OutputFormat::Json => {
            let files: Vec<_> = reports
                .iter()
                .map(|(path, report)| match report {
                    FileReport::Loaded(result) => json!({
                        "path": path,
                        "valid": result.is_valid(),
                        "codes": result.codes,
                        "messages": result.messages(),
                        "warnings": result
                            .warnings
                            .iter()
                            .map(|w| json!({ "path": w.path, "message": w.message }))
                            .collect::<Vec<_>>(),
                    }),
                    FileReport::Failed(message) => json!({
                        "path": path,
                        "valid": false,
                        "error": message,
                    }),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&files)?);
        }
    }

    match first_failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn print_human(path: &str, result: &ValidationResult) {
    for code in &result.codes {
        println!("{path}: {code}");
    }
}

pub(crate) fn log_load_warnings(warnings: &[LoadWarning]) {
    for warning in warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
}
