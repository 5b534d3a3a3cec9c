// Surveillance Station WebAPI HTTP client
//
// Wraps `reqwest::Client` with WebAPI-specific URL construction, the
// `{ success, data, error }` envelope unwrapping, and session token
// injection. Endpoint groups (camera, event, PTZ, session) are implemented
// as inherent methods via separate files so this module stays focused on
// transport mechanics.

use std::sync::RwLock;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ApiEnvelope;
use crate::transport::TransportConfig;

// ── API scripts ──
pub(crate) const SCRIPT_AUTH: &str = "webapi/auth.cgi";
pub(crate) const SCRIPT_ENTRY: &str = "webapi/entry.cgi";

// ── API names and versions ──
pub(crate) const API_AUTH: (&str, u8) = ("SYNO.API.Auth", 6);
pub(crate) const API_INFO: (&str, u8) = ("SYNO.API.Info", 1);
pub(crate) const API_CAMERA: (&str, u8) = ("SYNO.SurveillanceStation.Camera", 8);
pub(crate) const API_EVENT: (&str, u8) = ("SYNO.SurveillanceStation.Event", 5);
pub(crate) const API_PTZ: (&str, u8) = ("SYNO.SurveillanceStation.PTZ", 3);

/// Raw HTTP client for the Surveillance Station WebAPI.
///
/// Every call is a GET against `auth.cgi` or `entry.cgi` with
/// `api` / `version` / `method` query parameters plus the method's own
/// parameters and the `_sid` session token. The envelope is stripped
/// before the caller sees the payload.
pub struct SurveillanceClient {
    http: reqwest::Client,
    base_url: Url,
    /// Session token from `SYNO.API.Auth` Login. Written on login,
    /// cleared on logout; appended as `_sid` to every request.
    sid: RwLock<Option<String>>,
}

impl SurveillanceClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (DSM pairs the sid with an `id` cookie). `base_url`
    /// should be the DiskStation root, e.g. `https://diskstation:5001`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            sid: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when the transport is managed elsewhere (tests, shared
    /// clients).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            sid: RwLock::new(None),
        }
    }

    /// The DiskStation base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a session token is currently held.
    pub fn is_logged_in(&self) -> bool {
        self.sid.read().expect("sid lock poisoned").is_some()
    }

    // ── Session token management ─────────────────────────────────────

    pub(crate) fn set_sid(&self, sid: String) {
        debug!("storing session token");
        *self.sid.write().expect("sid lock poisoned") = Some(sid);
    }

    pub(crate) fn clear_sid(&self) {
        *self.sid.write().expect("sid lock poisoned") = None;
    }

    fn current_sid(&self) -> Option<String> {
        self.sid.read().expect("sid lock poisoned").clone()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full WebAPI URL: `{base}/{script}?api=&version=&method=&…&_sid=`.
    ///
    /// The `_sid` token is appended last when a session is held. Callers
    /// that must be sid-free (login itself) go through [`Self::build_url_no_sid`].
    pub(crate) fn build_url(
        &self,
        script: &str,
        api: (&str, u8),
        method: &str,
        params: &[(&str, String)],
    ) -> Result<Url, Error> {
        let mut url = self.build_url_no_sid(script, api, method, params)?;
        if let Some(sid) = self.current_sid() {
            url.query_pairs_mut().append_pair("_sid", &sid);
        }
        Ok(url)
    }

    pub(crate) fn build_url_no_sid(
        &self,
        script: &str,
        api: (&str, u8),
        method: &str,
        params: &[(&str, String)],
    ) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{script}"))?;
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("api", api.0);
            q.append_pair("version", &api.1.to_string());
            q.append_pair("method", method);
            for (key, value) in params {
                q.append_pair(key, value);
            }
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Call a WebAPI method and unwrap the envelope into `T`.
    ///
    /// Fails with [`Error::NotLoggedIn`] if no session is held — all
    /// `entry.cgi` methods require one.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        script: &str,
        api: (&str, u8),
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        if !self.is_logged_in() {
            return Err(Error::NotLoggedIn);
        }
        let url = self.build_url(script, api, method, params)?;
        self.call_url(url).await
    }

    /// Call a WebAPI URL directly (no sid requirement — used by login).
    pub(crate) async fn call_url<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {} {}", url.path(), url.query().unwrap_or(""));

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                code: i32::from(status.as_u16()),
                message: format!("HTTP {status}: {}", body.get(..200).unwrap_or(&body)),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(len = body.len(), "response body received");
        parse_envelope(&body)
    }

    /// Fetch a binary payload (snapshot JPEG). Surveillance Station reports
    /// failures on binary endpoints with a JSON error envelope and HTTP 200,
    /// so the content type is checked before accepting the bytes.
    pub(crate) async fn fetch_bytes(&self, url: Url) -> Result<Bytes, Error> {
        debug!("GET {} (binary)", url.path());

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::SnapshotFailed {
                status: status.as_u16(),
            });
        }

        let is_json = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));

        if is_json {
            let body = resp.text().await.map_err(Error::Transport)?;
            // Surface the envelope error if one is present.
            let _: serde_json::Value = parse_envelope(&body)?;
            return Err(Error::SnapshotFailed {
                status: status.as_u16(),
            });
        }

        resp.bytes().await.map_err(Error::Transport)
    }
}

/// Parse the `{ success, data, error }` envelope, returning `data` on
/// success or the mapped error code otherwise. A successful response with
/// no `data` member deserializes into `T` from JSON `null` (callers use
/// `Option<…>` or `Value` for those methods).
fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let envelope: ApiEnvelope = serde_json::from_str(body).map_err(|e| {
        let preview = body.get(..200).unwrap_or(body);
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })?;

    if !envelope.success {
        let code = envelope.error.map_or(100, |e| e.code);
        return Err(Error::from_code(code));
    }

    let data = envelope.data.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(data).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_success_unwraps_data() {
        let body = r#"{"success":true,"data":{"sid":"abc"}}"#;
        let value: serde_json::Value = parse_envelope(body).expect("parse");
        assert_eq!(value["sid"], "abc");
    }

    #[test]
    fn envelope_failure_maps_error_code() {
        let body = r#"{"success":false,"error":{"code":105}}"#;
        let result: Result<serde_json::Value, Error> = parse_envelope(body);
        assert!(matches!(result, Err(Error::SessionExpired)));
    }

    #[test]
    fn envelope_failure_without_code_is_unknown() {
        let body = r#"{"success":false}"#;
        let result: Result<serde_json::Value, Error> = parse_envelope(body);
        match result {
            Err(Error::Api { code, .. }) => assert_eq!(code, 100),
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
