// ── Event domain model ──
//
// The closed set of camera trigger categories, the per-kind tracked
// state, and the ON/OFF transition type the reconciler emits.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Camera event category. The vendor reports each as a numeric `reason`
/// code on event records; the set is closed, and matches over it are
/// exhaustive so a missing kind is a compile error.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Motion,
    Alarm,
    Manual,
    External,
    ActionRule,
}

impl EventKind {
    /// All kinds, in a fixed order usable as an array index.
    pub const ALL: [EventKind; 5] = [
        EventKind::Motion,
        EventKind::Alarm,
        EventKind::Manual,
        EventKind::External,
        EventKind::ActionRule,
    ];

    /// The vendor `reason` code for this kind.
    pub fn reason_code(self) -> i32 {
        match self {
            Self::Motion => 2,
            Self::Alarm => 3,
            Self::Manual => 6,
            Self::External => 9,
            Self::ActionRule => 10,
        }
    }

    /// Map a vendor `reason` code back to a kind. Codes outside the
    /// tracked set (continuous recording, edge cases) return `None`.
    pub fn from_reason(code: i32) -> Option<Self> {
        match code {
            2 => Some(Self::Motion),
            3 => Some(Self::Alarm),
            6 => Some(Self::Manual),
            9 => Some(Self::External),
            10 => Some(Self::ActionRule),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Motion => 0,
            Self::Alarm => 1,
            Self::Manual => 2,
            Self::External => 3,
            Self::ActionRule => 4,
        }
    }
}

/// Tracked state for one event kind on one camera.
///
/// `completed` is false only between an observed onset and its observed
/// completion; a `last_event_id` of 0 means no instance has ever been seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventState {
    pub last_event_id: i64,
    pub completed: bool,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            last_event_id: 0,
            completed: true,
        }
    }
}

/// The vendor's current view of one event kind, as taken from a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolledEvent {
    pub id: i64,
    pub completed: bool,
}

/// One edge-triggered output: a kind switching ON or OFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub kind: EventKind,
    pub active: bool,
}

impl Transition {
    pub fn on(kind: EventKind) -> Self {
        Self { kind, active: true }
    }

    pub fn off(kind: EventKind) -> Self {
        Self {
            kind,
            active: false,
        }
    }
}

/// Which event kinds a consumer currently cares about.
///
/// Cheaply cloneable; the watcher polls it fresh on every tick, so linking
/// or unlinking a kind takes effect on the next poll. Unlinked kinds keep
/// their stale tracked state until linked again.
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    inner: Arc<RwLock<HashSet<EventKind>>>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A link set with all five kinds linked.
    pub fn all() -> Self {
        let set = Self::new();
        for kind in EventKind::ALL {
            set.link(kind);
        }
        set
    }

    pub fn link(&self, kind: EventKind) {
        self.inner.write().expect("link set lock poisoned").insert(kind);
    }

    pub fn unlink(&self, kind: EventKind) {
        self.inner
            .write()
            .expect("link set lock poisoned")
            .remove(&kind);
    }

    pub fn is_linked(&self, kind: EventKind) -> bool {
        self.inner
            .read()
            .expect("link set lock poisoned")
            .contains(&kind)
    }

    pub fn any_linked(&self) -> bool {
        !self.inner.read().expect("link set lock poisoned").is_empty()
    }

    /// The linked kinds in the canonical [`EventKind::ALL`] order.
    pub fn linked(&self) -> Vec<EventKind> {
        let guard = self.inner.read().expect("link set lock poisoned");
        EventKind::ALL
            .into_iter()
            .filter(|k| guard.contains(k))
            .collect()
    }
}
