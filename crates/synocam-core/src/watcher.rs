// ── Per-camera event watcher ──
//
// The [`PollTask`] driven by each camera's scheduler. One fetch cycle:
// query open events since the stored window start, fold them into a
// per-kind snapshot, reconcile against tracked state, emit transitions,
// and stamp the new window. The window only advances on success, so a
// failed poll re-covers the same span next time.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use synocam_api::SurveillanceClient;

use crate::error::CoreError;
use crate::event::{EventKind, LinkSet, PolledEvent, Transition};
use crate::poller::PollTask;
use crate::reconcile::{EventSnapshot, EventTracker};

struct WatchState {
    tracker: EventTracker,
    /// Lower bound (station epoch seconds) of the next event query.
    window_start: i64,
}

/// Event poll task for a single camera.
///
/// Holds its own tracker and poll window; nothing is shared across
/// cameras except the API client. Transitions are pushed on an unbounded
/// channel since a poll cycle produces at most ten of them.
pub struct CameraWatcher {
    client: Arc<SurveillanceClient>,
    camera_id: i64,
    label: String,
    links: LinkSet,
    transitions: mpsc::UnboundedSender<Transition>,
    cancel: CancellationToken,
    state: Mutex<WatchState>,
}

impl CameraWatcher {
    /// Build a watcher and the receiving end of its transition channel.
    ///
    /// `initial_window_start` should sit a couple of poll intervals in the
    /// past so events raised just before the watcher started are still
    /// caught on the first fetch.
    pub fn new(
        client: Arc<SurveillanceClient>,
        camera_id: i64,
        links: LinkSet,
        cancel: CancellationToken,
        initial_window_start: i64,
    ) -> (Self, mpsc::UnboundedReceiver<Transition>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher = Self {
            client,
            camera_id,
            label: format!("camera-{camera_id}"),
            links,
            transitions: tx,
            cancel,
            state: Mutex::new(WatchState {
                tracker: EventTracker::new(),
                window_start: initial_window_start,
            }),
        };
        (watcher, rx)
    }

    pub fn camera_id(&self) -> i64 {
        self.camera_id
    }

    pub fn links(&self) -> &LinkSet {
        &self.links
    }

    #[cfg(test)]
    fn window_start(&self) -> i64 {
        match self.state.lock() {
            Ok(state) => state.window_start,
            Err(poisoned) => poisoned.into_inner().window_start,
        }
    }

    async fn fetch_and_reconcile(&self) -> Result<bool, CoreError> {
        let linked = self.links.linked();
        let reasons: Vec<i32> = linked.iter().map(|k| k.reason_code()).collect();

        let from_time = match self.state.lock() {
            Ok(state) => state.window_start,
            Err(poisoned) => poisoned.into_inner().window_start,
        };

        let query = match self
            .client
            .query_events(self.camera_id, from_time, &reasons)
            .await
        {
            Ok(query) => query,
            Err(err) if err.is_auth_expired() => return Err(CoreError::NotReady),
            Err(err) => {
                warn!(camera = self.label.as_str(), error = %err, "event query failed");
                return Ok(false);
            }
        };

        let mut snapshot = EventSnapshot::new(query.timestamp);
        for event in &query.events {
            let Some(kind) = EventKind::from_reason(event.reason) else {
                debug!(
                    camera = self.label.as_str(),
                    reason = event.reason,
                    "ignoring event with unknown reason code"
                );
                continue;
            };
            snapshot.observe(
                kind,
                PolledEvent {
                    id: event.id,
                    completed: event.is_complete,
                },
            );
        }

        // A fetch that raced a stop must not mutate tracked state or emit
        // transitions to consumers that already moved on.
        if self.cancel.is_cancelled() {
            return Ok(true);
        }

        let transitions = {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
            let links = &self.links;
            let transitions = state
                .tracker
                .reconcile(&snapshot, |kind| links.is_linked(kind));
            state.window_start = snapshot.timestamp;
            transitions
        };

        for transition in transitions {
            debug!(
                camera = self.label.as_str(),
                kind = %transition.kind,
                active = transition.active,
                "event transition"
            );
            // Receiver dropped means the consumer went away; the poller
            // will be stopped shortly after.
            let _ = self.transitions.send(transition);
        }

        Ok(true)
    }
}

impl PollTask for CameraWatcher {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_needed(&self) -> bool {
        self.links.any_linked()
    }

    fn poll(&self) -> impl Future<Output = Result<bool, CoreError>> + Send {
        self.fetch_and_reconcile()
    }
}
