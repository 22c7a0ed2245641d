//! `select` command.
//!
//! Loads and validates the configuration, resolves the initial device, and
//! runs the selector to make sure a reachable device is chosen.

use std::path::PathBuf;

use serde_json::json;

use crate::cli::args::{OutputFormat, SelectArgs};
use crate::cli::commands::validate::log_load_warnings;
use crate::config::{ConfigLoader, Validator, loader::default_config_path};
use crate::device::{DeviceSelector, ProbeSettings, ResolvedDeviceState, TcpProbe};
use crate::error::{ConfigError, RokuDeployError};
use crate::options::Options;

/// Pick a device for the requested mode and print it.
///
/// # Errors
///
/// Returns a usage error when no configuration path can be determined, a
/// configuration error when loading, validation, or device lookup fails,
/// and a device error when no usable device answers.
pub async fn run(args: &SelectArgs) -> Result<(), RokuDeployError> {
    let path = config_path(args)?;
    let load_result = ConfigLoader::with_defaults().load(&path)?;
    log_load_warnings(&load_result.warnings);
    let config = load_result.config;

    let result = Validator::new().validate(&config);
    if result.has_errors() {
        for message in result.messages() {
            tracing::error!("{message}");
        }
        return Err(ConfigError::Invalid {
            path: path.display().to_string(),
            codes: result.codes,
        }
        .into());
    }

    let mut state = ResolvedDeviceState::from_config(&config, args.device.as_deref())?;
    let options = Options::new(args.mode, args.device.is_some());

    let settings = ProbeSettings::default();
    tracing::debug!(
        attempts = settings.attempts,
        port = settings.port,
        worst_case = ?settings.worst_case(),
        "probe settings"
    );
    let selector = DeviceSelector::new(TcpProbe::new(settings));
    selector.resolve(&options, &config, &mut state).await?;

    match args.format {
        OutputFormat::Human => println!("{}", state.device_config.ip),
        OutputFormat::Json => {
            let output = json!({
                "mode": args.mode,
                "device": state.device_config,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn config_path(args: &SelectArgs) -> Result<PathBuf, RokuDeployError> {
    args.config
        .clone()
        .or_else(default_config_path)
        .ok_or_else(|| {
            RokuDeployError::Usage("no --config given and HOME is not set".to_string())
        })
}
