//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use synocam_config::ConfigError;
use synocam_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to station at {url}")]
    #[diagnostic(
        code(synocam::connection_failed),
        help(
            "Check that the DiskStation is running and reachable.\n\
             URL: {url}\n\
             Try: synocam cameras list --insecure"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(synocam::auth_failed),
        help(
            "Verify the account name and password for this profile.\n\
             Run: synocam config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(synocam::no_credentials),
        help(
            "Configure credentials with: synocam config init\n\
             Or set the SYNOCAM_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Camera '{identifier}' not found")]
    #[diagnostic(
        code(synocam::camera_not_found),
        help("Run: synocam cameras list to see available cameras")
    )]
    CameraNotFound { identifier: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Station API error: {message}")]
    #[diagnostic(code(synocam::api_error))]
    ApiError { message: String, code: Option<i32> },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(synocam::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(synocam::profile_not_found),
        help("Create one with: synocam config init")
    )]
    ProfileNotFound { name: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(synocam::no_config),
        help(
            "Create one with: synocam config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(synocam::config))]
    Config(String),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(synocam::timeout),
        help("Increase timeout with --timeout or check station responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(synocam::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::CameraNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError ─────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NotReady => CliError::AuthFailed {
                message: "session not established".into(),
            },
            CoreError::Timeout => CliError::Timeout { seconds: 0 },
            CoreError::CameraNotFound { identifier } => CliError::CameraNotFound { identifier },
            CoreError::Rejected { message } => CliError::ApiError {
                message,
                code: None,
            },
            CoreError::Api { message, code } => CliError::ApiError { message, code },
            CoreError::Config { message } => CliError::Config(message),
            CoreError::Internal(message) => CliError::ApiError {
                message,
                code: None,
            },
        }
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { profile } => CliError::ProfileNotFound { name: profile },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            other => CliError::Config(other.to_string()),
        }
    }
}
