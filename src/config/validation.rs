//! Configuration validation
//!
//! Walks the tagged configuration tree and reports every defect as a
//! numbered [`ErrorCode`]. Validation never stops at the first problem:
//! each offending entry contributes its own code, so the same number can
//! appear several times. A clean configuration yields exactly
//! `[ErrorCode::Valid]`.
//!
//! Non-fatal findings (dangling `default` references, odd list items) are
//! collected separately as warnings and never change the code list.

use tracing::debug;

use crate::config::codes::ErrorCode;
use crate::config::schema::{
    DEVICES, IP_PLACEHOLDER, PASSWORD_PLACEHOLDER, PROJECT_ID_PLACEHOLDER, PROJECTS,
    USER_PLACEHOLDER, filled_field,
};
use crate::config::value::{ConfigValue, DEFAULT_KEY};

// ============================================================================
// Public API
// ============================================================================

/// A non-fatal finding reported alongside the error codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path to the problematic value (e.g. `projects.app.files[2]`)
    pub path: String,
    /// Description of the issue
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "warning: {} at {}", self.message, self.path)
    }
}

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Error codes in check order; `[Valid]` when nothing is wrong.
    pub codes: Vec<ErrorCode>,

    /// Warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if validation found no defects.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.codes == [ErrorCode::Valid]
    }

    /// Returns `true` if any defect code was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.is_valid()
    }

    /// Returns the catalog message for every reported code, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<&'static str> {
        self.codes.iter().map(|code| code.message()).collect()
    }
}

/// Validates a configuration and returns its error codes.
#[must_use]
pub fn validate(config: &ConfigValue) -> Vec<ErrorCode> {
    Validator::new().validate(config).codes
}

/// Required device fields, their template placeholders, and the code
/// reported when the field is unusable.
const DEVICE_FIELDS: [(&str, &str, ErrorCode); 3] = [
    ("ip", IP_PLACEHOLDER, ErrorCode::DeviceIpMissing),
    ("user", USER_PLACEHOLDER, ErrorCode::DeviceUserMissing),
    ("password", PASSWORD_PLACEHOLDER, ErrorCode::DevicePasswordMissing),
];

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    codes: Vec<ErrorCode>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns the result.
    ///
    /// Every check runs; a missing section only skips the checks that
    /// depend on it.
    pub fn validate(&mut self, config: &ConfigValue) -> ValidationResult {
        self.codes.clear();
        self.warnings.clear();

        let devices = config.get(DEVICES);
        let projects = config.get(PROJECTS);

        self.validate_devices_section(devices);
        self.validate_projects_section(projects);

        if let Some(devices) = devices {
            for (id, entry) in devices.entries() {
                self.validate_device(id, entry);
            }
        }
        if let Some(projects) = projects {
            for (id, entry) in projects.entries() {
                self.validate_project(id, entry);
            }
        }

        if self.codes.is_empty() {
            self.codes.push(ErrorCode::Valid);
        }

        ValidationResult {
            codes: std::mem::take(&mut self.codes),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Sections
    // ========================================================================

    fn validate_devices_section(&mut self, devices: Option<&ConfigValue>) {
        let Some(devices) = devices else {
            self.report(ErrorCode::DevicesMissing, DEVICES);
            return;
        };

        match devices.get(DEFAULT_KEY) {
            None => self.report(ErrorCode::DevicesDefaultMissing, "devices.default"),
            Some(default) => match default.as_identifier() {
                Some(id) => self.check_reference(devices, id, "devices.default"),
                None => self.report(ErrorCode::DevicesDefaultNotIdentifier, "devices.default"),
            },
        }
    }

    fn validate_projects_section(&mut self, projects: Option<&ConfigValue>) {
        let Some(projects) = projects else {
            self.report(ErrorCode::ProjectsMissing, PROJECTS);
            return;
        };

        match projects.get(DEFAULT_KEY) {
            None => self.report(ErrorCode::ProjectsDefaultMissing, "projects.default"),
            Some(default) => match default.as_identifier() {
                Some(PROJECT_ID_PLACEHOLDER) => {
                    self.report(ErrorCode::ProjectsDefaultMissing, "projects.default");
                }
                Some(id) => self.check_reference(projects, id, "projects.default"),
                None => self.report(ErrorCode::ProjectsDefaultNotIdentifier, "projects.default"),
            },
        }
    }

    // ========================================================================
    // Entries
    // ========================================================================

    fn validate_device(&mut self, id: &str, entry: &ConfigValue) {
        for (field, placeholder, code) in DEVICE_FIELDS {
            if filled_field(entry, field, placeholder).is_none() {
                self.report(code, &format!("devices.{id}.{field}"));
            }
        }
    }

    fn validate_project(&mut self, id: &str, entry: &ConfigValue) {
        if entry.get("app_name").is_none() {
            self.report(ErrorCode::ProjectAppNameMissing, &format!("projects.{id}.app_name"));
        }
        if entry.get("directory").is_none() {
            self.report(ErrorCode::ProjectDirectoryMissing, &format!("projects.{id}.directory"));
        }

        self.validate_path_list(
            entry,
            &format!("projects.{id}.folders"),
            "folders",
            ErrorCode::ProjectFoldersMissing,
            ErrorCode::ProjectFoldersNotSequence,
        );
        self.validate_path_list(
            entry,
            &format!("projects.{id}.files"),
            "files",
            ErrorCode::ProjectFilesMissing,
            ErrorCode::ProjectFilesNotSequence,
        );

        // A project without `stages` simply has no stages.
        let stages = entry
            .get("stages")
            .and_then(ConfigValue::as_mapping)
            .into_iter()
            .flatten();
        for (stage, config) in stages {
            let has_branch = config
                .get("branch")
                .and_then(ConfigValue::as_str)
                .is_some_and(|branch| !branch.is_empty());
            if !has_branch {
                self.report(
                    ErrorCode::StageBranchMissing,
                    &format!("projects.{id}.stages.{stage}.branch"),
                );
            }
        }
    }

    fn validate_path_list(
        &mut self,
        entry: &ConfigValue,
        path: &str,
        field: &str,
        missing: ErrorCode,
        not_sequence: ErrorCode,
    ) {
        match entry.get(field) {
            None => self.report(missing, path),
            Some(ConfigValue::Sequence(items)) => {
                for (index, item) in items.iter().enumerate() {
                    if !matches!(item, ConfigValue::String(_)) {
                        self.add_warning(
                            &format!("{path}[{index}]"),
                            format!("expected a path string, found {}", item.type_name()),
                        );
                    }
                }
            }
            Some(_) => self.report(not_sequence, path),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn check_reference(&mut self, section: &ConfigValue, id: &str, path: &str) {
        if !section.entries().any(|(key, _)| key == id) {
            self.add_warning(path, format!("'{id}' does not name an entry in this section"));
        }
    }

    fn report(&mut self, code: ErrorCode, path: &str) {
        debug!(code = code.code(), path, "{}", code.message());
        self.codes.push(code);
    }

    fn add_warning(&mut self, path: &str, message: String) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
