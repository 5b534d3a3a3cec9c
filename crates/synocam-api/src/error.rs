use thiserror::Error;

/// Top-level error type for the `synocam-api` crate.
///
/// Covers every failure mode across the WebAPI surface: authentication,
/// transport, the `{"error":{"code":N}}` envelope, and payload decoding.
/// `synocam-core` maps these into domain-appropriate variants.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, disabled account, locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session has expired or the sid was rejected (codes 105/106/107/119).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    /// A request was issued before `login()` established a session.
    #[error("Not logged in -- no session token available")]
    NotLoggedIn,

    /// 2FA code required but not provided (code 403).
    #[error("Two-factor authentication code required")]
    TwoFactorRequired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── WebAPI envelope ─────────────────────────────────────────────
    /// Structured error from the WebAPI (`success: false` with a code).
    #[error("Surveillance Station API error {code}: {message}")]
    Api { code: i32, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A snapshot request returned something other than image data.
    #[error("Snapshot request returned no image (HTTP {status})")]
    SnapshotFailed { status: u16 },

    /// A camera id was absent from a response that should have carried it.
    #[error("Camera {camera_id} not found")]
    CameraNotFound { camera_id: i64 },
}

impl Error {
    /// Map a WebAPI error code to an `Error`, classifying the session and
    /// credential codes into their dedicated variants.
    pub(crate) fn from_code(code: i32) -> Self {
        match code {
            105 | 106 | 107 | 119 => Self::SessionExpired,
            400 => Self::Authentication {
                message: "invalid account or password".into(),
            },
            401 => Self::Authentication {
                message: "account disabled".into(),
            },
            402 => Self::Authentication {
                message: "permission denied".into(),
            },
            403 => Self::TwoFactorRequired,
            other => Self::Api {
                code: other,
                message: describe_code(other).into(),
            },
        }
    }

    /// Returns `true` if this error indicates the session is gone and
    /// re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotLoggedIn)
    }

    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll tick.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Human-readable description for the common WebAPI error codes.
fn describe_code(code: i32) -> &'static str {
    match code {
        100 => "unknown error",
        101 => "invalid parameter",
        102 => "API does not exist",
        103 => "method does not exist",
        104 => "this API version is not supported",
        117 => "operation requires administrator privileges",
        _ => "unrecognized error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_codes_map_to_session_expired() {
        for code in [105, 106, 107, 119] {
            assert!(matches!(Error::from_code(code), Error::SessionExpired));
        }
    }

    #[test]
    fn credential_codes_map_to_authentication() {
        assert!(matches!(
            Error::from_code(400),
            Error::Authentication { .. }
        ));
        assert!(matches!(Error::from_code(403), Error::TwoFactorRequired));
    }

    #[test]
    fn other_codes_keep_their_number() {
        match Error::from_code(101) {
            Error::Api { code, .. } => assert_eq!(code, 101),
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
