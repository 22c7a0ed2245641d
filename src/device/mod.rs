//! Device selection
//!
//! Reachability probing, the per-run device state, and the selector that
//! falls back across configured devices when the current one is offline.

pub mod probe;
pub mod selector;
pub mod state;

pub use probe::{Probe, ProbeSettings, TcpProbe};
pub use selector::DeviceSelector;
pub use state::ResolvedDeviceState;
