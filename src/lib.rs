//! `roku-deploy` - configuration validation and device selection for Roku
//! sideloading.
//!
//! The library validates the device/project configuration file, reporting
//! every defect as a numbered code, and picks a reachable device for a run,
//! falling back across configured devices when the preferred one is offline.

pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod observability;
pub mod options;

pub use config::{ConfigValue, ErrorCode, error_codes, validate};
pub use device::{DeviceSelector, Probe, ResolvedDeviceState};
pub use error::{ConfigError, DeviceError, RokuDeployError};
pub use options::{Mode, Options};
