//! Async client for the Synology Surveillance Station WebAPI.
//!
//! All requests go through [`SurveillanceClient`], which owns the HTTP
//! transport, the session token (`_sid`), and the
//! `{ "success": bool, "data": …, "error": { "code": N } }` envelope
//! handling. Endpoint groups (camera, event, PTZ, session) are implemented
//! as inherent methods in separate modules to keep [`client`] focused on
//! transport mechanics.

pub mod camera;
pub mod client;
pub mod error;
pub mod event;
pub mod models;
pub mod ptz;
pub mod session;
pub mod transport;

pub use client::SurveillanceClient;
pub use error::Error;
pub use models::{
    ApiInfo, CameraDto, CameraStatus, EventDto, EventQuery, PatrolDto, PresetDto,
};
pub use ptz::{PtzDirection, ZoomControl};
pub use transport::{TlsMode, TransportConfig};
