// ── Station facade ──
//
// Owns the authenticated API client and the root cancellation token.
// Consumers connect once, then either call pass-through operations
// (camera listing, snapshots, PTZ) or start per-camera watch loops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use synocam_api::{
    CameraDto, EventDto, PatrolDto, PresetDto, PtzDirection, SurveillanceClient, TlsMode,
    TransportConfig, ZoomControl,
};

use crate::config::{StationConfig, TlsVerification};
use crate::error::CoreError;
use crate::event::{EventKind, LinkSet, Transition};
use crate::poller::{CameraHealth, Poller};
use crate::watcher::CameraWatcher;

/// A running watch loop for one camera.
///
/// Dropping the handle does not stop the loop; call
/// [`stop()`](Self::stop) or shut the whole [`Station`] down.
pub struct CameraHandle {
    camera_id: i64,
    links: LinkSet,
    poller: Poller<CameraWatcher>,
    transitions: mpsc::UnboundedReceiver<Transition>,
}

impl CameraHandle {
    pub fn camera_id(&self) -> i64 {
        self.camera_id
    }

    /// The linked event kinds. Starts with all kinds linked; unlink the
    /// ones you don't care about and the watcher stops reconciling them.
    pub fn links(&self) -> &LinkSet {
        &self.links
    }

    pub fn health(&self) -> watch::Receiver<CameraHealth> {
        self.poller.health().subscribe()
    }

    pub fn current_health(&self) -> CameraHealth {
        self.poller.health().current()
    }

    /// Receive the next ON/OFF transition. `None` once the watcher has
    /// been stopped and the channel drained.
    pub async fn next_transition(&mut self) -> Option<Transition> {
        self.transitions.recv().await
    }

    pub async fn set_interval(&self, period: Duration) {
        self.poller.set_interval(period).await;
    }

    pub async fn stop(&self) {
        self.poller.stop().await;
    }
}

/// Connected Surveillance Station.
///
/// Cheap to clone; all clones share one session and one root cancellation
/// token.
#[derive(Clone)]
pub struct Station {
    inner: Arc<StationInner>,
}

struct StationInner {
    config: StationConfig,
    client: Arc<SurveillanceClient>,
    cancel: CancellationToken,
}

impl Station {
    /// Build the transport, authenticate, and verify the session works.
    pub async fn connect(config: StationConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout,
            ..TransportConfig::default()
        }
        .with_cookie_jar();

        let client = SurveillanceClient::new(config.url.clone(), &transport)?;
        client
            .login(&config.account, &config.password)
            .await
            .map_err(|err| match err {
                synocam_api::Error::Authentication { .. } => CoreError::AuthenticationFailed {
                    message: err.to_string(),
                },
                other => CoreError::from(other),
            })?;
        info!(url = %config.url, account = %config.account, "logged in to surveillance station");

        Ok(Self {
            inner: Arc::new(StationInner {
                config,
                client: Arc::new(client),
                cancel: CancellationToken::new(),
            }),
        })
    }

    pub fn config(&self) -> &StationConfig {
        &self.inner.config
    }

    /// Start watching a camera's events.
    ///
    /// The poll window initially reaches two intervals into the past so
    /// events raised shortly before the watch began are still observed.
    /// Polling is disabled entirely when the configured interval is 0.
    pub async fn watch_camera(&self, camera_id: i64) -> CameraHandle {
        let interval = Duration::from_secs(self.inner.config.poll_interval_secs);
        let window_start = chrono::Utc::now().timestamp() - 2 * interval.as_secs() as i64;

        let links = LinkSet::all();
        let cancel = self.inner.cancel.child_token();
        let (watcher, transitions) = CameraWatcher::new(
            Arc::clone(&self.inner.client),
            camera_id,
            links.clone(),
            cancel.clone(),
            window_start,
        );

        let poller = Poller::new(Arc::new(watcher), cancel);
        poller.start(interval).await;
        debug!(camera_id, interval_secs = interval.as_secs(), "camera watch started");

        CameraHandle {
            camera_id,
            links,
            poller,
            transitions,
        }
    }

    /// Stop all watch loops and end the session.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Err(err) = self.inner.client.logout().await {
            warn!(error = %err, "logout failed during shutdown");
        }
        debug!("station shut down");
    }

    // ── Pass-through operations ──────────────────────────────────────

    pub async fn list_cameras(&self) -> Result<Vec<CameraDto>, CoreError> {
        Ok(self.inner.client.list_cameras().await?)
    }

    pub async fn camera_info(&self, camera_id: i64) -> Result<CameraDto, CoreError> {
        self.inner
            .client
            .camera_info(camera_id)
            .await
            .map_err(|err| match err {
                synocam_api::Error::CameraNotFound { .. } => CoreError::CameraNotFound {
                    identifier: camera_id.to_string(),
                },
                other => CoreError::from(other),
            })
    }

    pub async fn enable_camera(&self, camera_id: i64) -> Result<(), CoreError> {
        Ok(self.inner.client.enable_camera(camera_id).await?)
    }

    pub async fn disable_camera(&self, camera_id: i64) -> Result<(), CoreError> {
        Ok(self.inner.client.disable_camera(camera_id).await?)
    }

    /// Fetch a JPEG snapshot using the configured stream profile.
    pub async fn snapshot(&self, camera_id: i64) -> Result<bytes::Bytes, CoreError> {
        self.snapshot_with_stream(camera_id, self.inner.config.snapshot_stream_id)
            .await
    }

    /// Fetch a JPEG snapshot from a specific stream profile.
    pub async fn snapshot_with_stream(
        &self,
        camera_id: i64,
        stream_id: u8,
    ) -> Result<bytes::Bytes, CoreError> {
        Ok(self.inner.client.snapshot(camera_id, stream_id).await?)
    }

    /// Events for a camera within the last `window` seconds, restricted to
    /// `kinds` (all kinds when empty).
    pub async fn recent_events(
        &self,
        camera_id: i64,
        window: Duration,
        kinds: &[EventKind],
    ) -> Result<Vec<EventDto>, CoreError> {
        let reasons: Vec<i32> = if kinds.is_empty() {
            EventKind::ALL.iter().map(|k| k.reason_code()).collect()
        } else {
            kinds.iter().map(|k| k.reason_code()).collect()
        };
        let from_time = chrono::Utc::now().timestamp() - window.as_secs() as i64;
        let query = self
            .inner
            .client
            .query_events(camera_id, from_time, &reasons)
            .await?;
        Ok(query.events)
    }

    pub async fn ptz_move(
        &self,
        camera_id: i64,
        direction: PtzDirection,
        speed: u8,
    ) -> Result<(), CoreError> {
        Ok(self.inner.client.ptz_move(camera_id, direction, speed).await?)
    }

    pub async fn ptz_zoom(&self, camera_id: i64, control: ZoomControl) -> Result<(), CoreError> {
        Ok(self.inner.client.ptz_zoom(camera_id, control).await?)
    }

    pub async fn list_presets(&self, camera_id: i64) -> Result<Vec<PresetDto>, CoreError> {
        Ok(self.inner.client.list_presets(camera_id).await?)
    }

    pub async fn go_preset(&self, camera_id: i64, preset_id: i64) -> Result<(), CoreError> {
        Ok(self.inner.client.go_preset(camera_id, preset_id).await?)
    }

    pub async fn list_patrols(&self, camera_id: i64) -> Result<Vec<PatrolDto>, CoreError> {
        Ok(self.inner.client.list_patrols(camera_id).await?)
    }

    pub async fn run_patrol(&self, camera_id: i64, patrol_id: i64) -> Result<(), CoreError> {
        Ok(self.inner.client.run_patrol(camera_id, patrol_id).await?)
    }
}
