//! Device reachability probing.
//!
//! A probe answers one question: does anything answer at this address
//! within a fixed budget? Attempt count, retry interval, and timeout are
//! fixed per process (defaults overridable via environment), never per
//! call.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::config::loader::env_or;

/// Roku External Control Protocol port, open on every device.
pub const ECP_PORT: u16 = 8060;

/// Default number of connection attempts per probe.
pub const DEFAULT_ATTEMPTS: u32 = 1;

/// Default pause between attempts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Reachability check for a device address.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Returns `true` if `address` answered within the probe's budget.
    async fn reachable(&self, address: &str) -> bool;
}

#[async_trait]
impl<P: Probe + ?Sized> Probe for Arc<P> {
    async fn reachable(&self, address: &str) -> bool {
        (**self).reachable(address).await
    }
}

/// Fixed probe parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Connection attempts before giving up (at least one is always made).
    pub attempts: u32,
    /// Pause between attempts.
    pub interval: Duration,
    /// Timeout for each attempt.
    pub timeout: Duration,
    /// Port used when the address does not carry one.
    pub port: u16,
}

impl ProbeSettings {
    /// Built-in defaults, ignoring the environment.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            port: ECP_PORT,
        }
    }

    /// Upper bound on how long a single probe can take.
    #[must_use]
    pub fn worst_case(&self) -> Duration {
        let attempts = self.attempts.max(1);
        self.timeout * attempts + self.interval * (attempts - 1)
    }
}

impl Default for ProbeSettings {
    /// Built-in defaults with `ROKU_DEPLOY_PROBE_*` overrides applied.
    fn default() -> Self {
        let builtin = Self::builtin();
        Self {
            attempts: env_or("ROKU_DEPLOY_PROBE_ATTEMPTS", builtin.attempts),
            interval: env_duration("ROKU_DEPLOY_PROBE_INTERVAL", builtin.interval),
            timeout: env_duration("ROKU_DEPLOY_PROBE_TIMEOUT", builtin.timeout),
            port: env_or("ROKU_DEPLOY_PROBE_PORT", builtin.port),
        }
    }
}

fn env_duration(name: &str, default: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|v| humantime::parse_duration(v.trim()).ok())
        .unwrap_or(default)
}

/// Probe that opens a TCP connection to the device.
#[derive(Debug, Clone, Default)]
pub struct TcpProbe {
    settings: ProbeSettings,
}

impl TcpProbe {
    #[must_use]
    pub const fn new(settings: ProbeSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Resolves the `host:port` to dial for `address`.
    ///
    /// Addresses that already carry a port are used as-is.
    #[must_use]
    pub fn target(&self, address: &str) -> String {
        if let Ok(ip) = address.parse::<IpAddr>() {
            return SocketAddr::new(ip, self.settings.port).to_string();
        }
        if address.parse::<SocketAddr>().is_ok() || address.contains(':') {
            return address.to_string();
        }
        format!("{address}:{}", self.settings.port)
    }

    async fn attempt(&self, addr: &str) -> bool {
        match tokio::time::timeout(self.settings.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                trace!(addr, error = %e, "connection refused or failed");
                false
            }
            Err(_) => {
                trace!(addr, timeout = ?self.settings.timeout, "connection timed out");
                false
            }
        }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn reachable(&self, address: &str) -> bool {
        let addr = self.target(address);
        for attempt in 1..=self.settings.attempts.max(1) {
            if attempt > 1 {
                tokio::time::sleep(self.settings.interval).await;
            }
            if self.attempt(&addr).await {
                debug!(%addr, attempt, "device reachable");
                return true;
            }
        }
        debug!(%addr, attempts = self.settings.attempts, "device unreachable");
        false
    }
}
