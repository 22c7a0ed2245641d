//! Invocation options consumed by device selection.

use serde::Serialize;

/// What the current run is going to do.
///
/// Only some operations talk to a device; the rest never trigger
/// reachability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Install the project on the device.
    #[default]
    Sideload,
    /// Have the device sign and package the sideloaded app.
    Package,
    /// Run the project's unit tests on the device.
    Test,
    /// Launch the sideloaded app with deep-link parameters.
    Deeplink,
    /// Remove the sideloaded app.
    Delete,
    /// Grab a screenshot from the device.
    Screencapture,
    /// Build a zip locally.
    Build,
    /// Check the configuration only.
    Validate,
}

impl Mode {
    /// Returns `true` if this mode needs a reachable device.
    #[must_use]
    pub const fn requires_device(self) -> bool {
        !matches!(self, Self::Build | Self::Validate)
    }
}

/// Options for one device resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// A specific device was requested; disables fallback.
    pub device_given: bool,
    /// Current operation.
    pub mode: Mode,
}

impl Options {
    #[must_use]
    pub const fn new(mode: Mode, device_given: bool) -> Self {
        Self { device_given, mode }
    }
}
