//! Configuration for the synocam CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `synocam_core::StationConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use synocam_core::{StationConfig, TlsVerification};

/// Keyring service name under which passwords are stored.
const KEYRING_SERVICE: &str = "synocam";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' in the config file")]
    ProfileNotFound { profile: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring access failed: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named station profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named station profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// DiskStation base URL (e.g., "https://192.168.1.10:5001").
    pub station: String,

    /// DSM account name.
    pub account: Option<String>,

    /// Account password (plaintext — prefer keyring or env).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Per-camera event poll interval (seconds). 0 disables polling.
    pub poll_interval: Option<u64>,

    /// Snapshot stream profile: 1 live, 2 balanced, 3 low bandwidth.
    pub snapshot_stream: Option<u8>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "synocam", "synocam").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("synocam");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("SYNOCAM_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Profile selection ───────────────────────────────────────────────

/// Pick a profile by explicit name, falling back to `default_profile`.
pub fn select_profile<'a>(
    config: &'a Config,
    name: Option<&str>,
) -> Result<(String, &'a Profile), ConfigError> {
    let name = name
        .map(ToOwned::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    config
        .profiles
        .get(&name)
        .map(|profile| (name.clone(), profile))
        .ok_or(ConfigError::ProfileNotFound { profile: name })
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a profile's password from the credential chain:
/// env var (profile's `password_env`, then `SYNOCAM_PASSWORD`), system
/// keyring, plaintext in the config file.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }
    if let Ok(val) = std::env::var("SYNOCAM_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a password in the system keyring for a profile.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))?;
    entry.set_password(password)?;
    Ok(())
}

// ── Translation to StationConfig ────────────────────────────────────

/// Build a `StationConfig` from a profile — no CLI flag overrides.
pub fn profile_to_station_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<StationConfig, ConfigError> {
    let url: url::Url = profile
        .station
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "station".into(),
            reason: format!("invalid URL: {}", profile.station),
        })?;

    let account = profile
        .account
        .clone()
        .ok_or_else(|| ConfigError::Validation {
            field: "account".into(),
            reason: "no account configured".into(),
        })?;

    let password = resolve_password(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::DangerAcceptInvalid // local DiskStations typically self-signed
    };

    Ok(StationConfig {
        url,
        account,
        password,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(30)),
        poll_interval_secs: profile.poll_interval.unwrap_or(5),
        snapshot_stream_id: profile.snapshot_stream.unwrap_or(1),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bare_profile() -> Profile {
        Profile {
            station: "https://192.168.1.10:5001".into(),
            account: Some("admin".into()),
            password: Some("hunter2".into()),
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            poll_interval: None,
            snapshot_stream: None,
        }
    }

    #[test]
    fn profile_translates_with_defaults() {
        let cfg = profile_to_station_config(&bare_profile(), "default").unwrap();

        assert_eq!(cfg.url.as_str(), "https://192.168.1.10:5001/");
        assert_eq!(cfg.account, "admin");
        assert_eq!(cfg.poll_interval_secs, 5);
        assert_eq!(cfg.snapshot_stream_id, 1);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let mut profile = bare_profile();
        profile.station = "not a url".into();

        let err = profile_to_station_config(&profile, "default").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "station"));
    }

    #[test]
    fn missing_account_is_a_validation_error() {
        let mut profile = bare_profile();
        profile.account = None;

        let err = profile_to_station_config(&profile, "default").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "account"));
    }

    #[test]
    fn select_profile_falls_back_to_default_name() {
        let mut config = Config::default();
        config.profiles.insert("default".into(), bare_profile());

        let (name, _) = select_profile(&config, None).unwrap();
        assert_eq!(name, "default");

        let err = select_profile(&config, Some("other")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { ref profile } if profile == "other"));
    }
}
