//! Validation error codes and their message catalog.
//!
//! Codes are persisted and compared by number, so the discriminants are
//! fixed: `0` is the "valid" sentinel and `1..=16` name one defect each.

use serde::Serialize;

/// A single outcome reported by the configuration validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
#[repr(u8)]
pub enum ErrorCode {
    /// No defects were found.
    Valid = 0,
    /// `devices` is absent.
    DevicesMissing = 1,
    /// `devices.default` is absent.
    DevicesDefaultMissing = 2,
    /// `devices.default` is not an identifier.
    DevicesDefaultNotIdentifier = 3,
    /// `projects` is absent.
    ProjectsMissing = 4,
    /// `projects.default` is absent or still the `<project id>` placeholder.
    ProjectsDefaultMissing = 5,
    /// `projects.default` is not an identifier.
    ProjectsDefaultNotIdentifier = 6,
    /// A device has no `ip`, or it is still `xxx.xxx.xxx.xxx`.
    DeviceIpMissing = 7,
    /// A device has no `user`, or it is still `<username>`.
    DeviceUserMissing = 8,
    /// A device has no `password`, or it is still `<password>`.
    DevicePasswordMissing = 9,
    /// A project has no `app_name`.
    ProjectAppNameMissing = 10,
    /// A project has no `directory`.
    ProjectDirectoryMissing = 11,
    /// A project has no `folders`.
    ProjectFoldersMissing = 12,
    /// A project's `folders` is not a list.
    ProjectFoldersNotSequence = 13,
    /// A project has no `files`.
    ProjectFilesMissing = 14,
    /// A project's `files` is not a list.
    ProjectFilesNotSequence = 15,
    /// A project stage has no non-empty `branch`.
    StageBranchMissing = 16,
}

/// Message for each code, indexed by the code's number.
const CATALOG: [&str; 17] = [
    "Valid config.",
    "Devices config is missing.",
    "Devices default is missing.",
    "Devices default is not an identifier.",
    "Projects config is missing.",
    "Projects default is missing.",
    "Projects default is not an identifier.",
    "A device config is missing its IP address.",
    "A device config is missing its username.",
    "A device config is missing its password.",
    "A project config is missing its app_name.",
    "A project config is missing its directory.",
    "A project config is missing its folders.",
    "A project config's folders is not a list.",
    "A project config is missing its files.",
    "A project config's files is not a list.",
    "A project stage is missing its branch.",
];

/// Returns the message catalog, indexed by code number.
#[must_use]
pub const fn error_codes() -> &'static [&'static str; 17] {
    &CATALOG
}

impl ErrorCode {
    /// Every code in ordinal order.
    pub const ALL: [Self; 17] = [
        Self::Valid,
        Self::DevicesMissing,
        Self::DevicesDefaultMissing,
        Self::DevicesDefaultNotIdentifier,
        Self::ProjectsMissing,
        Self::ProjectsDefaultMissing,
        Self::ProjectsDefaultNotIdentifier,
        Self::DeviceIpMissing,
        Self::DeviceUserMissing,
        Self::DevicePasswordMissing,
        Self::ProjectAppNameMissing,
        Self::ProjectDirectoryMissing,
        Self::ProjectFoldersMissing,
        Self::ProjectFoldersNotSequence,
        Self::ProjectFilesMissing,
        Self::ProjectFilesNotSequence,
        Self::StageBranchMissing,
    ];

    /// Returns the numeric code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the catalog message for this code.
    #[must_use]
    pub const fn message(self) -> &'static str {
        CATALOG[self as usize]
    }

    /// Looks up a code by number.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}
