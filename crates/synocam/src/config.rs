//! CLI-side configuration glue: profile selection plus flag overrides.
//!
//! The TOML format, credential chain, and keyring access live in
//! `synocam-config`; this module layers `GlobalOpts` on top and produces
//! the `StationConfig` handed to core.

use std::time::Duration;

use secrecy::SecretString;

use synocam_config::{self as cfg, Config};
use synocam_core::{StationConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `StationConfig` from the config file, profile, and CLI flags.
pub fn build_station_config(global: &GlobalOpts) -> Result<StationConfig, CliError> {
    let config = cfg::load_config_or_default();
    let profile_name = active_profile_name(global, &config);

    if let Some(profile) = config.profiles.get(&profile_name) {
        let mut station = cfg::profile_to_station_config(profile, &profile_name)?;
        apply_overrides(&mut station, global)?;
        return Ok(station);
    }

    // No profile — build from flags / env alone.
    let url_str = global.station.as_deref().ok_or_else(|| CliError::NoConfig {
        path: cfg::config_path().display().to_string(),
    })?;
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "station".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let account = global
        .account
        .clone()
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;
    let password = std::env::var("SYNOCAM_PASSWORD")
        .map(SecretString::from)
        .map_err(|_| CliError::NoCredentials {
            profile: profile_name,
        })?;

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(StationConfig {
        url,
        account,
        password,
        tls,
        timeout: Duration::from_secs(global.timeout),
        ..StationConfig::default()
    })
}

fn apply_overrides(station: &mut StationConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref url_str) = global.station {
        station.url = url_str.parse().map_err(|_| CliError::Validation {
            field: "station".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }
    if let Some(ref account) = global.account {
        station.account.clone_from(account);
    }
    if global.insecure {
        station.tls = TlsVerification::DangerAcceptInvalid;
    }
    station.timeout = Duration::from_secs(global.timeout);
    Ok(())
}
