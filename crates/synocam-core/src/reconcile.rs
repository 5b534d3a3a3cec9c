// ── Event reconciliation ──
//
// Turns a polled snapshot of currently-open vendor events into
// edge-triggered ON/OFF transitions. The vendor state is level-triggered
// (an event is "open" or it isn't); downstream consumers want pulses.
// The tracked per-kind state guarantees every ON is paired with exactly
// one OFF, even when an event starts and completes between two polls.

use crate::event::{EventKind, EventState, PolledEvent, Transition};

/// A per-kind view of one successful poll: which kinds currently have an
/// open (or just-closed) event instance, and the station timestamp that
/// becomes the next poll window's lower bound.
#[derive(Debug, Clone)]
pub struct EventSnapshot {
    per_kind: [Option<PolledEvent>; 5],
    pub timestamp: i64,
}

impl EventSnapshot {
    pub fn new(timestamp: i64) -> Self {
        Self {
            per_kind: [None; 5],
            timestamp,
        }
    }

    /// Record an observation for a kind. When a poll returns several
    /// instances of the same kind, the highest event id wins — ids are
    /// issued monotonically, so that is the most recent instance.
    pub fn observe(&mut self, kind: EventKind, event: PolledEvent) {
        let slot = &mut self.per_kind[kind.index()];
        match slot {
            Some(existing) if existing.id >= event.id => {}
            _ => *slot = Some(event),
        }
    }

    pub fn get(&self, kind: EventKind) -> Option<&PolledEvent> {
        self.per_kind[kind.index()].as_ref()
    }
}

/// Tracked event state for one camera: one [`EventState`] per kind.
///
/// Created once per camera watcher and mutated only by
/// [`reconcile`](Self::reconcile) — the poll scheduler's in-flight guard
/// serializes those calls.
#[derive(Debug, Default)]
pub struct EventTracker {
    states: [EventState; 5],
}

impl EventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, kind: EventKind) -> &EventState {
        &self.states[kind.index()]
    }

    /// Reconcile a fresh snapshot against the tracked state, returning the
    /// transitions to emit. Only kinds for which `is_linked` returns true
    /// are considered; unlinked kinds keep their stale state untouched.
    ///
    /// Per linked kind:
    /// - absent from the snapshot: the instance is treated as ended.
    ///   `completed` is forced true and a single OFF is emitted if the
    ///   kind was previously open. Absent kinds that were already
    ///   completed emit nothing.
    /// - present with a new event id: ON is emitted and the id is
    ///   adopted. If the instance is already complete (it started and
    ///   ended between polls), OFF follows immediately so consumers still
    ///   see the triggering.
    /// - present with the known id: an observed completion emits one OFF;
    ///   anything else is a no-op.
    pub fn reconcile(
        &mut self,
        snapshot: &EventSnapshot,
        mut is_linked: impl FnMut(EventKind) -> bool,
    ) -> Vec<Transition> {
        let mut transitions = Vec::new();

        for kind in EventKind::ALL {
            if !is_linked(kind) {
                continue;
            }
            let state = &mut self.states[kind.index()];

            match snapshot.get(kind) {
                None => {
                    if !state.completed {
                        state.completed = true;
                        transitions.push(Transition::off(kind));
                    }
                }
                Some(event) if event.id != state.last_event_id => {
                    state.last_event_id = event.id;
                    state.completed = event.completed;
                    transitions.push(Transition::on(kind));
                    if event.completed {
                        transitions.push(Transition::off(kind));
                    }
                }
                Some(event) => {
                    if event.completed && !state.completed {
                        state.completed = true;
                        transitions.push(Transition::off(kind));
                    }
                }
            }
        }

        transitions
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn linked_all(_: EventKind) -> bool {
        true
    }

    fn snapshot_with(entries: &[(EventKind, i64, bool)]) -> EventSnapshot {
        let mut snap = EventSnapshot::new(1000);
        for &(kind, id, completed) in entries {
            snap.observe(kind, PolledEvent { id, completed });
        }
        snap
    }

    #[test]
    fn new_incomplete_event_emits_on() {
        let mut tracker = EventTracker::new();
        let snap = snapshot_with(&[(EventKind::Motion, 42, false)]);

        let transitions = tracker.reconcile(&snap, linked_all);

        assert_eq!(transitions, vec![Transition::on(EventKind::Motion)]);
        assert_eq!(tracker.state(EventKind::Motion).last_event_id, 42);
        assert!(!tracker.state(EventKind::Motion).completed);
    }

    #[test]
    fn known_event_completing_emits_one_off() {
        let mut tracker = EventTracker::new();
        tracker.reconcile(&snapshot_with(&[(EventKind::Motion, 42, false)]), linked_all);

        let transitions =
            tracker.reconcile(&snapshot_with(&[(EventKind::Motion, 42, true)]), linked_all);

        assert_eq!(transitions, vec![Transition::off(EventKind::Motion)]);
        assert!(tracker.state(EventKind::Motion).completed);

        // A third poll with the same completed instance emits nothing.
        let transitions =
            tracker.reconcile(&snapshot_with(&[(EventKind::Motion, 42, true)]), linked_all);
        assert_eq!(transitions, vec![]);
    }

    #[test]
    fn event_completed_on_first_observation_pulses_on_then_off() {
        // Started and ended between two polls: the ON must not be lost.
        let mut tracker = EventTracker::new();

        let transitions =
            tracker.reconcile(&snapshot_with(&[(EventKind::Alarm, 7, true)]), linked_all);

        assert_eq!(
            transitions,
            vec![Transition::on(EventKind::Alarm), Transition::off(EventKind::Alarm)]
        );
        assert!(tracker.state(EventKind::Alarm).completed);
    }

    #[test]
    fn absent_open_event_is_forced_off() {
        let mut tracker = EventTracker::new();
        tracker.reconcile(&snapshot_with(&[(EventKind::Alarm, 7, false)]), linked_all);

        // Vendor silence is authoritative closure.
        let transitions = tracker.reconcile(&snapshot_with(&[]), linked_all);

        assert_eq!(transitions, vec![Transition::off(EventKind::Alarm)]);
        assert_eq!(tracker.state(EventKind::Alarm).last_event_id, 7);
        assert!(tracker.state(EventKind::Alarm).completed);
    }

    #[test]
    fn absent_completed_kind_emits_nothing() {
        let mut tracker = EventTracker::new();
        tracker.reconcile(&snapshot_with(&[(EventKind::Motion, 5, true)]), linked_all);

        // present→absent after completion, then absent→absent.
        assert_eq!(tracker.reconcile(&snapshot_with(&[]), linked_all), vec![]);
        assert_eq!(tracker.reconcile(&snapshot_with(&[]), linked_all), vec![]);
    }

    #[test]
    fn never_seen_kinds_never_emit() {
        let mut tracker = EventTracker::new();

        for _ in 0..3 {
            assert_eq!(tracker.reconcile(&snapshot_with(&[]), linked_all), vec![]);
        }
        for kind in EventKind::ALL {
            assert_eq!(tracker.state(kind), &EventState::default());
        }
    }

    #[test]
    fn superseding_event_id_retriggers() {
        // A new instance replaces an unfinished previous one: the new ON
        // fires without waiting for the old instance's OFF.
        let mut tracker = EventTracker::new();
        tracker.reconcile(&snapshot_with(&[(EventKind::Motion, 10, false)]), linked_all);

        let transitions =
            tracker.reconcile(&snapshot_with(&[(EventKind::Motion, 11, false)]), linked_all);

        assert_eq!(transitions, vec![Transition::on(EventKind::Motion)]);
        assert_eq!(tracker.state(EventKind::Motion).last_event_id, 11);
    }

    #[test]
    fn full_lifecycle_emits_exactly_one_on_and_one_off() {
        let mut tracker = EventTracker::new();
        let mut all: Vec<Transition> = Vec::new();

        all.extend(tracker.reconcile(&snapshot_with(&[(EventKind::Manual, 3, false)]), linked_all));
        all.extend(tracker.reconcile(&snapshot_with(&[(EventKind::Manual, 3, false)]), linked_all));
        all.extend(tracker.reconcile(&snapshot_with(&[(EventKind::Manual, 3, true)]), linked_all));
        all.extend(tracker.reconcile(&snapshot_with(&[]), linked_all));

        assert_eq!(
            all,
            vec![Transition::on(EventKind::Manual), Transition::off(EventKind::Manual)]
        );
    }

    #[test]
    fn unlinked_kinds_are_skipped_and_keep_stale_state() {
        let mut tracker = EventTracker::new();
        tracker.reconcile(&snapshot_with(&[(EventKind::Motion, 8, false)]), linked_all);

        // Motion unlinked: its open instance is neither reconciled nor
        // closed, even though the snapshot no longer carries it.
        let transitions = tracker.reconcile(&snapshot_with(&[]), |k| k != EventKind::Motion);
        assert_eq!(transitions, vec![]);
        assert!(!tracker.state(EventKind::Motion).completed);

        // Relinked: the absence now forces the overdue OFF.
        let transitions = tracker.reconcile(&snapshot_with(&[]), linked_all);
        assert_eq!(transitions, vec![Transition::off(EventKind::Motion)]);
    }

    #[test]
    fn kinds_reconcile_independently() {
        let mut tracker = EventTracker::new();
        let snap = snapshot_with(&[
            (EventKind::Motion, 100, false),
            (EventKind::External, 101, true),
        ]);

        let transitions = tracker.reconcile(&snap, linked_all);

        assert_eq!(
            transitions,
            vec![
                Transition::on(EventKind::Motion),
                Transition::on(EventKind::External),
                Transition::off(EventKind::External),
            ]
        );
    }

    #[test]
    fn snapshot_keeps_highest_event_id_per_kind() {
        let mut snap = EventSnapshot::new(0);
        snap.observe(EventKind::Motion, PolledEvent { id: 5, completed: true });
        snap.observe(EventKind::Motion, PolledEvent { id: 9, completed: false });
        snap.observe(EventKind::Motion, PolledEvent { id: 7, completed: true });

        assert_eq!(
            snap.get(EventKind::Motion),
            Some(&PolledEvent { id: 9, completed: false })
        );
    }

    #[test]
    fn first_motion_instance_from_fresh_state() {
        // prior {Motion: id=0, completed=true} + snapshot {Motion: id=42,
        // completed=false} → state {42, false}, transitions [Motion=ON].
        let mut tracker = EventTracker::new();
        let transitions =
            tracker.reconcile(&snapshot_with(&[(EventKind::Motion, 42, false)]), linked_all);

        assert_eq!(transitions, vec![Transition::on(EventKind::Motion)]);
        assert_eq!(
            tracker.state(EventKind::Motion),
            &EventState { last_event_id: 42, completed: false }
        );
    }
}
