//! Device selection with fallback.
//!
//! The run's current device is probed first. If it does not answer and no
//! device was explicitly requested, every configured device is probed in
//! file order and the first one that answers replaces the current device.
//! Probes run one at a time, so "first" always means earliest in the file.

use tracing::{info, warn};

use crate::config::schema::{DEVICES, DeviceEntry};
use crate::config::value::ConfigValue;
use crate::device::probe::Probe;
use crate::device::state::ResolvedDeviceState;
use crate::error::DeviceError;
use crate::options::Options;

/// Picks a reachable device for the current run.
#[derive(Debug, Clone)]
pub struct DeviceSelector<P> {
    probe: P,
}

impl<P: Probe> DeviceSelector<P> {
    #[must_use]
    pub const fn new(probe: P) -> Self {
        Self { probe }
    }

    #[must_use]
    pub const fn probe(&self) -> &P {
        &self.probe
    }

    /// Makes sure `state` points at a reachable device.
    ///
    /// Modes that do not talk to a device return immediately without
    /// probing. Otherwise the current device is probed; on failure the
    /// configured devices are scanned unless `options.device_given` is set.
    /// `state` is only modified when a fallback device is chosen.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::RequestedUnreachable`] when an explicitly
    /// requested device does not answer, and [`DeviceError::NoneReachable`]
    /// when neither the current device nor any configured device answers.
    pub async fn resolve(
        &self,
        options: &Options,
        config: &ConfigValue,
        state: &mut ResolvedDeviceState,
    ) -> Result<(), DeviceError> {
        if !options.mode.requires_device() {
            return Ok(());
        }

        let current = state.device_config.ip.clone();
        if self.probe.reachable(&current).await {
            info!(ip = %current, "device online");
            return Ok(());
        }

        if options.device_given {
            return Err(DeviceError::RequestedUnreachable { ip: current });
        }

        let mut tried = vec![current];
        for (id, entry) in config.get(DEVICES).into_iter().flat_map(|d| d.entries()) {
            let Some(candidate) = DeviceEntry::from_value(entry) else {
                warn!(device = id, "skipping device without a usable ip");
                continue;
            };
            if self.probe.reachable(&candidate.ip).await {
                warn!(
                    device = id,
                    ip = %candidate.ip,
                    previous = %tried[0],
                    "current device offline, switching to alternate"
                );
                state.device_config = candidate;
                return Ok(());
            }
            tried.push(candidate.ip);
        }

        Err(DeviceError::NoneReachable { tried })
    }
}
