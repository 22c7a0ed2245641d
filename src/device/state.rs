//! Session state describing the device a run targets.

use serde::Serialize;
use tracing::debug;

use crate::config::schema::{DEVICES, DeviceEntry};
use crate::config::value::{ConfigValue, DEFAULT_KEY};
use crate::error::ConfigError;

/// Maximum edit distance for "did you mean" suggestions.
const SUGGESTION_DISTANCE: usize = 3;

/// The device the current run is pointed at.
///
/// Created once per run. Device selection overwrites `device_config` when
/// it falls back to another configured device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedDeviceState {
    /// Connection details of the device in use.
    pub device_config: DeviceEntry,
}

impl ResolvedDeviceState {
    #[must_use]
    pub const fn new(device_config: DeviceEntry) -> Self {
        Self { device_config }
    }

    /// Picks the starting device: `requested` if given, otherwise the one
    /// named by `devices.default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownDevice`] if the id is not configured
    /// (or has no usable address), and [`ConfigError::MissingDefault`] if
    /// nothing was requested and `devices.default` is not an identifier.
    pub fn from_config(config: &ConfigValue, requested: Option<&str>) -> Result<Self, ConfigError> {
        let devices = config.get(DEVICES);
        let name = match requested {
            Some(name) => name,
            None => devices
                .and_then(|d| d.get(DEFAULT_KEY))
                .and_then(ConfigValue::as_identifier)
                .ok_or(ConfigError::MissingDefault)?,
        };

        let entry = devices
            .into_iter()
            .flat_map(|devices| devices.entries())
            .find(|(id, _)| *id == name)
            .and_then(|(_, entry)| DeviceEntry::from_value(entry));

        match entry {
            Some(device_config) => {
                debug!(device = name, ip = %device_config.ip, "resolved initial device");
                Ok(Self { device_config })
            }
            None => Err(ConfigError::UnknownDevice {
                name: name.to_string(),
                suggestion: suggest_device(config, name),
            }),
        }
    }
}

/// Suggests the configured device id closest to `input`.
///
/// Returns the closest match if its Damerau-Levenshtein distance is ≤ 3.
#[must_use]
pub fn suggest_device(config: &ConfigValue, input: &str) -> Option<String> {
    config
        .get(DEVICES)?
        .entries()
        .map(|(id, _)| (id, strsim::damerau_levenshtein(input, id)))
        .filter(|(id, dist)| *dist <= SUGGESTION_DISTANCE && *id != input)
        .min_by_key(|(_, dist)| *dist)
        .map(|(id, _)| id.to_string())
}
