// ── Core error types ──
//
// User-facing errors from synocam-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<synocam_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to station at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    /// The session is not (or no longer) established. Expected during
    /// startup and relogin races; poll loops treat it as transient.
    #[error("Station session not ready")]
    NotReady,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Camera not found: {identifier}")]
    CameraNotFound { identifier: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected by station: {message}")]
    Rejected { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api { message: String, code: Option<i32> },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Transient not-ready conditions are swallowed at debug level by the
    /// poll scheduler instead of being treated as failures.
    pub fn is_transient_startup(&self) -> bool {
        matches!(self, Self::NotReady)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<synocam_api::Error> for CoreError {
    fn from(err: synocam_api::Error) -> Self {
        match err {
            synocam_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            synocam_api::Error::TwoFactorRequired => CoreError::AuthenticationFailed {
                message: "two-factor authentication code required".into(),
            },
            synocam_api::Error::SessionExpired | synocam_api::Error::NotLoggedIn => {
                CoreError::NotReady
            }
            synocam_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                    }
                }
            }
            synocam_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            synocam_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            synocam_api::Error::Api { code, message } => CoreError::Api {
                message,
                code: Some(code),
            },
            synocam_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
            synocam_api::Error::SnapshotFailed { status } => CoreError::Rejected {
                message: format!("snapshot request failed (HTTP {status})"),
            },
            synocam_api::Error::CameraNotFound { camera_id } => CoreError::CameraNotFound {
                identifier: camera_id.to_string(),
            },
        }
    }
}
