//! Camera polling and event reconciliation on top of `synocam-api`.
//!
//! This crate owns the business logic of the workspace:
//!
//! - **[`Station`]** — facade managing the full lifecycle:
//!   [`connect()`](Station::connect) authenticates, then
//!   [`watch_camera()`](Station::watch_camera) spawns a per-camera polling
//!   loop and hands back a [`CameraHandle`] with transition and health
//!   channels. Camera, snapshot, and PTZ operations pass through with
//!   api-to-core error translation.
//!
//! - **[`Poller`]** — fixed-interval scheduler with an atomic in-flight
//!   guard: overlapping firings are skipped (never queued), a per-tick
//!   `is_needed` predicate gates the fetch, and task outcomes drive an
//!   idempotent online/offline [`CameraHealth`] signal.
//!
//! - **[`EventTracker`]** — the reconciler. Turns a polled snapshot of
//!   currently-open vendor events (level-triggered) into edge-triggered
//!   ON/OFF [`Transition`]s per [`EventKind`], guaranteeing exactly one
//!   OFF for every ON even when an event starts and ends between polls.

pub mod config;
pub mod error;
pub mod event;
pub mod poller;
pub mod reconcile;
pub mod station;
pub mod watcher;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{StationConfig, TlsVerification};
pub use error::CoreError;
pub use event::{EventKind, EventState, LinkSet, PolledEvent, Transition};
pub use poller::{CameraHealth, HealthSignal, PollTask, Poller};
pub use reconcile::{EventSnapshot, EventTracker};
pub use station::{CameraHandle, Station};
pub use watcher::CameraWatcher;

// API-layer types that cross the facade boundary unchanged.
pub use synocam_api::{
    CameraDto, CameraStatus, EventDto, PatrolDto, PresetDto, PtzDirection, ZoomControl,
};
