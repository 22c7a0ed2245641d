//! Shared integration-test harness: fixture lookup, binary spawning, and a
//! scripted reachability probe.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;

use async_trait::async_trait;
use roku_deploy::config::{ConfigFormat, ConfigLoader, ConfigValue};
use roku_deploy::device::Probe;

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Runs the `roku-deploy` binary to completion with the given arguments.
///
/// Logging env vars are cleared so stderr only carries what the test asks
/// for.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    spawn_command_with_env(args, &[])
}

/// Like [`spawn_command`] with extra environment variables.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command_with_env(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let bin = env!("CARGO_BIN_EXE_roku-deploy");
    Command::new(bin)
        .args(args)
        .env_remove("ROKU_DEPLOY_LOG_LEVEL")
        .env_remove("ROKU_DEPLOY_LOG_FORMAT")
        .env_remove("ROKU_DEPLOY_CONFIG")
        .envs(envs.iter().copied())
        .output()
        .expect("failed to run roku-deploy")
}

/// Parses an inline JSON configuration the way the CLI loads a file.
#[allow(clippy::missing_panics_doc)]
pub fn load_json(text: &str) -> ConfigValue {
    ConfigLoader::with_defaults()
        .load_from_str(text, Path::new("inline.json"), ConfigFormat::Json)
        .expect("inline config should parse")
        .config
}

/// Parses an inline YAML configuration.
#[allow(clippy::missing_panics_doc)]
pub fn load_yaml(text: &str) -> ConfigValue {
    ConfigLoader::with_defaults()
        .load_from_str(text, Path::new("inline.yaml"), ConfigFormat::Yaml)
        .expect("inline config should parse")
        .config
}

/// Probe answering from a fixed set of reachable addresses.
///
/// Every probed address is recorded in call order.
#[derive(Default)]
pub struct ScriptedProbe {
    online: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    #[must_use]
    pub fn online(addresses: &[&str]) -> Self {
        Self {
            online: addresses.iter().map(ToString::to_string).collect(),
            calls: Mutex::default(),
        }
    }

    #[allow(clippy::missing_panics_doc)]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn reachable(&self, address: &str) -> bool {
        self.calls.lock().unwrap().push(address.to_string());
        self.online.contains(address)
    }
}
