// ── Runtime connection configuration ──
//
// These types describe *how* to reach a Surveillance Station. They carry
// credential data and connection tuning, but never touch disk — the CLI
// constructs a `StationConfig` and hands it in.

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs). Default for local DiskStations.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single Surveillance Station.
#[derive(Debug, Clone)]
pub struct StationConfig {
    /// DiskStation base URL (e.g., `https://192.168.1.10:5001`).
    pub url: Url,
    /// DSM account name.
    pub account: String,
    /// DSM account password.
    pub password: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: std::time::Duration,
    /// Event polling interval per camera, in seconds. 0 disables polling.
    pub poll_interval_secs: u64,
    /// Snapshot stream profile (`camStm`): 1 live, 2 balanced, 3 low bandwidth.
    pub snapshot_stream_id: u8,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            url: "https://192.168.1.10:5001"
                .parse()
                .expect("default URL is valid"),
            account: "admin".into(),
            password: SecretString::from(String::new()),
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(30),
            poll_interval_secs: 5,
            snapshot_stream_id: 1,
        }
    }
}
