// WebAPI response types
//
// Models for the Surveillance Station JSON API. Every response is wrapped
// in the `{ success, data, error }` envelope. Fields use `#[serde(default)]`
// liberally because DSM firmware revisions are inconsistent about field
// presence, and a flattened `extra` map catches the rest.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

// ── Response envelope ────────────────────────────────────────────────

/// Standard WebAPI response envelope:
/// `{ "success": true, "data": { … } }` or
/// `{ "success": false, "error": { "code": 105 } }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: i32,
}

// ── SYNO.API.Info ────────────────────────────────────────────────────

/// One entry from `SYNO.API.Info` `Query` — where an API lives and which
/// versions the station supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub path: String,
    #[serde(rename = "minVersion")]
    pub min_version: u8,
    #[serde(rename = "maxVersion")]
    pub max_version: u8,
}

/// `Query` returns a map keyed by API name.
pub type ApiInfoMap = HashMap<String, ApiInfo>;

// ── SYNO.API.Auth ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    pub sid: String,
}

// ── SYNO.SurveillanceStation.Camera ──────────────────────────────────

/// Camera record from `Camera.List` / `Camera.GetInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDto {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// Numeric camera status — see [`CameraStatus`].
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub enabled: bool,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CameraDto {
    pub fn camera_status(&self) -> CameraStatus {
        CameraStatus::from_code(self.status)
    }
}

/// Decoded camera status codes from the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CameraStatus {
    Normal,
    Deleted,
    Disconnected,
    Unavailable,
    Ready,
    Inaccessible,
    Disabled,
    Unrecognized,
    Setting,
    Other(i32),
}

impl CameraStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Normal,
            2 => Self::Deleted,
            3 => Self::Disconnected,
            4 => Self::Unavailable,
            5 => Self::Ready,
            6 => Self::Inaccessible,
            7 => Self::Disabled,
            8 => Self::Unrecognized,
            9 => Self::Setting,
            other => Self::Other(other),
        }
    }
}

impl std::fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Other(code) => write!(f, "status {code}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CameraListData {
    #[serde(default)]
    pub cameras: Vec<CameraDto>,
}

// ── SYNO.SurveillanceStation.Event ───────────────────────────────────

/// One event record from `Event.List`.
///
/// `reason` is the vendor trigger category (2 motion, 3 alarm, 6 manual,
/// 9 external, 10 action rule); `is_complete` marks an event whose
/// recording has finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    #[serde(alias = "eventId")]
    pub id: i64,
    #[serde(default, rename = "cameraId", alias = "camera_id")]
    pub camera_id: i64,
    #[serde(default)]
    pub reason: i32,
    #[serde(default, rename = "startTime", deserialize_with = "de_flexible_i64")]
    pub start_time: i64,
    #[serde(default, rename = "stopTime", deserialize_with = "de_flexible_i64")]
    pub stop_time: i64,
    #[serde(default, rename = "is_complete")]
    pub is_complete: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventListData {
    #[serde(default)]
    pub events: Vec<EventDto>,
    /// Server-side timestamp for the query, used as the lower bound of the
    /// next poll window. DSM emits it as a string on some firmwares.
    #[serde(default, deserialize_with = "de_flexible_i64")]
    pub timestamp: i64,
}

/// The unwrapped result of an event query: the events plus the timestamp
/// to use as the next poll window's lower bound.
#[derive(Debug, Clone)]
pub struct EventQuery {
    pub timestamp: i64,
    pub events: Vec<EventDto>,
}

// ── SYNO.SurveillanceStation.PTZ ─────────────────────────────────────

/// PTZ preset position from `PTZ.ListPreset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetDto {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PresetListData {
    #[serde(default)]
    pub presets: Vec<PresetDto>,
}

/// PTZ patrol route from `PTZ.ListPatrol`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolDto {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PatrolListData {
    #[serde(default)]
    pub patrols: Vec<PatrolDto>,
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Accept an integer either as a JSON number or as a quoted string
/// (DSM mixes both across firmware versions). Missing and malformed
/// values fall back to 0 via `#[serde(default)]` on the field.
fn de_flexible_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => Ok(n),
        Some(Raw::Str(s)) => Ok(s.trim().parse().unwrap_or(0)),
        None => Ok(0),
    }
}
