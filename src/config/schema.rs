//! Configuration schema: section names, field names, placeholder sentinels,
//! and the typed device entry extracted from the tagged tree.

use serde::Serialize;

use crate::config::value::ConfigValue;

/// Top-level section holding device entries.
pub const DEVICES: &str = "devices";

/// Top-level section holding project entries.
pub const PROJECTS: &str = "projects";

/// Placeholder left in the config template for a device address.
pub const IP_PLACEHOLDER: &str = "xxx.xxx.xxx.xxx";

/// Placeholder left in the config template for a device username.
pub const USER_PLACEHOLDER: &str = "<username>";

/// Placeholder left in the config template for a device password.
pub const PASSWORD_PLACEHOLDER: &str = "<password>";

/// Placeholder left in the config template for `projects.default`.
pub const PROJECT_ID_PLACEHOLDER: &str = "<project id>";

/// Returns the text of `field` if it holds a usable value: a non-empty
/// string that is not `placeholder`.
#[must_use]
pub fn filled_field<'a>(entry: &'a ConfigValue, field: &str, placeholder: &str) -> Option<&'a str> {
    entry
        .get(field)
        .and_then(ConfigValue::as_str)
        .filter(|value| !value.is_empty() && *value != placeholder)
}

/// Connection details of one device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceEntry {
    /// Device address.
    pub ip: String,
    /// Developer-mode username.
    pub user: String,
    /// Developer-mode password.
    #[serde(skip_serializing)]
    pub password: String,
}

impl DeviceEntry {
    /// Builds an entry from its address alone.
    #[must_use]
    pub fn with_ip(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            ..Self::default()
        }
    }

    /// Extracts a device entry from a configuration mapping.
    ///
    /// Returns `None` when the entry has no usable `ip`. Missing credentials
    /// are left empty; the validator is responsible for reporting them.
    #[must_use]
    pub fn from_value(value: &ConfigValue) -> Option<Self> {
        let ip = filled_field(value, "ip", IP_PLACEHOLDER)?;
        let text = |field: &str| {
            value
                .get(field)
                .and_then(ConfigValue::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(Self {
            ip: ip.to_string(),
            user: text("user"),
            password: text("password"),
        })
    }
}
