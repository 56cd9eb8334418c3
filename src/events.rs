//! Event observation for the label lifecycle.
//!
//! External code can subscribe to label events via [`EventController`].
//! Each event carries a set of [`EventKind`] flags (bitflags-style) and is
//! delivered to a subscriber when `(event.kinds & filter) != 0`.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::surface::{DataPos, LabelRef};

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

/// Bitflags describing the categories an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u32);

impl EventKind {
    /// Interactive labeling was enabled on a surface.
    pub const ENABLED: Self = Self(1 << 0);
    /// Interactive labeling was disabled (existing labels untouched).
    pub const DISABLED: Self = Self(1 << 1);
    /// A new label was created by clicking a line.
    pub const LABEL_CREATED: Self = Self(1 << 2);
    /// A label was repositioned during a drag.
    pub const LABEL_MOVED: Self = Self(1 << 3);
    /// A label was deleted via its deletion affordance.
    pub const LABEL_DELETED: Self = Self(1 << 4);
    /// A drag session started on a label.
    pub const DRAG_STARTED: Self = Self(1 << 5);
    /// A drag session finished (pointer released).
    pub const DRAG_FINISHED: Self = Self(1 << 6);

    /// Wildcard: matches every event kind.
    pub const ALL: Self = Self(u32::MAX);

    /// Combine two event kinds (bitwise OR).
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether `self` contains all bits in `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether `self` intersects with `other` (at least one bit in common).
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns `true` if no bits are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for EventKind {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }

        let pairs: &[(EventKind, &str)] = &[
            (EventKind::ENABLED, "ENABLED"),
            (EventKind::DISABLED, "DISABLED"),
            (EventKind::LABEL_CREATED, "LABEL_CREATED"),
            (EventKind::LABEL_MOVED, "LABEL_MOVED"),
            (EventKind::LABEL_DELETED, "LABEL_DELETED"),
            (EventKind::DRAG_STARTED, "DRAG_STARTED"),
            (EventKind::DRAG_FINISHED, "DRAG_FINISHED"),
        ];

        let mut names = Vec::new();
        let mut known_bits: u32 = 0;
        for (kind, name) in pairs {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }

        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{:x}", extra));
        }

        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LabelEvent
// ─────────────────────────────────────────────────────────────────────────────

/// Metadata attached to label lifecycle events.
#[derive(Debug, Clone)]
pub struct LabelMeta {
    /// The label this event is about.
    pub label: LabelRef,
    /// Position of the label at event time (data-space).
    pub position: DataPos,
    /// The label's identifier text.
    pub text: String,
}

/// An event emitted by the labeling machinery.
#[derive(Debug, Clone)]
pub struct LabelEvent {
    /// Bitflag set of categories this event belongs to.
    pub kinds: EventKind,
    /// Monotonic timestamp (seconds since controller creation).
    pub timestamp: f64,
    /// Metadata, present on `LABEL_*` and `DRAG_*` events.
    pub label: Option<LabelMeta>,
}

impl LabelEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0, // set by the controller on emit
            label: None,
        }
    }

    pub fn with_label(kinds: EventKind, meta: LabelMeta) -> Self {
        Self {
            kinds,
            timestamp: 0.0,
            label: Some(meta),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

/// Selects which event categories a subscriber receives (OR-mask).
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    /// Accept all events.
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    /// Accept only the specified event kinds.
    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    #[inline]
    pub fn matches(&self, event: &LabelEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventController
// ─────────────────────────────────────────────────────────────────────────────

struct Subscriber {
    filter: EventFilter,
    sender: Sender<LabelEvent>,
}

/// Collects and distributes label events to subscribers.
///
/// Attach one to a [`LineLabeler`](crate::LineLabeler) and call
/// [`subscribe`](Self::subscribe) to receive events on an `mpsc` channel.
#[derive(Clone)]
pub struct EventController {
    inner: Arc<Mutex<EventCtrlInner>>,
}

struct EventCtrlInner {
    subscribers: Vec<Subscriber>,
    start_instant: std::time::Instant,
}

impl EventController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventCtrlInner {
                subscribers: Vec::new(),
                start_instant: std::time::Instant::now(),
            })),
        }
    }

    /// Subscribe to events matching the given filter.
    pub fn subscribe(&self, filter: EventFilter) -> Receiver<LabelEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.push(Subscriber { filter, sender: tx });
        rx
    }

    /// Subscribe to all events (no filtering).
    pub fn subscribe_all(&self) -> Receiver<LabelEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Emit an event to all subscribers whose filter matches.
    ///
    /// Subscribers whose receiving end was dropped are pruned.
    pub(crate) fn emit(&self, mut event: LabelEvent) {
        let mut inner = self.inner.lock().unwrap();
        event.timestamp = inner.start_instant.elapsed().as_secs_f64();
        inner.subscribers.retain(|sub| {
            if sub.filter.matches(&event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }
}

impl Default for EventController {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_union_and_intersection() {
        let created = EventKind::LABEL_CREATED;
        let moved = EventKind::LABEL_MOVED;
        let combined = created | moved;
        assert!(combined.contains(created));
        assert!(combined.contains(moved));
        assert!(combined.intersects(created));
        assert!(!EventKind::DISABLED.intersects(created));
    }

    #[test]
    fn event_kind_display() {
        assert_eq!(format!("{}", EventKind::LABEL_CREATED), "LABEL_CREATED");
        let combo = EventKind::DRAG_STARTED | EventKind::DRAG_FINISHED;
        assert_eq!(format!("{}", combo), "DRAG_STARTED|DRAG_FINISHED");
        assert_eq!(format!("{}", EventKind::ALL), "ALL");
        assert!(format!("{}", EventKind(1 << 31)).starts_with("0x"));
    }

    #[test]
    fn event_kinds_do_not_overlap() {
        let all_kinds = [
            EventKind::ENABLED,
            EventKind::DISABLED,
            EventKind::LABEL_CREATED,
            EventKind::LABEL_MOVED,
            EventKind::LABEL_DELETED,
            EventKind::DRAG_STARTED,
            EventKind::DRAG_FINISHED,
        ];
        for (i, a) in all_kinds.iter().enumerate() {
            for (j, b) in all_kinds.iter().enumerate() {
                if i != j {
                    assert!(!a.intersects(*b), "kinds {} and {} overlap", i, j);
                }
            }
        }
    }

    #[test]
    fn filter_selects_matching_kinds() {
        let filter = EventFilter::only(EventKind::LABEL_DELETED);
        assert!(filter.matches(&LabelEvent::new(EventKind::LABEL_DELETED)));
        assert!(!filter.matches(&LabelEvent::new(EventKind::LABEL_CREATED)));
    }

    #[test]
    fn controller_delivers_filtered_events() {
        let ctrl = EventController::new();
        let rx_all = ctrl.subscribe_all();
        let rx_created = ctrl.subscribe(EventFilter::only(EventKind::LABEL_CREATED));
        let rx_deleted = ctrl.subscribe(EventFilter::only(EventKind::LABEL_DELETED));

        ctrl.emit(LabelEvent::new(EventKind::LABEL_CREATED));

        assert!(rx_all.try_recv().is_ok());
        assert!(rx_created.try_recv().is_ok());
        assert!(rx_deleted.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_is_pruned() {
        let ctrl = EventController::new();
        let rx1 = ctrl.subscribe_all();
        let rx2 = ctrl.subscribe_all();
        drop(rx1);

        ctrl.emit(LabelEvent::new(EventKind::ENABLED));
        assert!(rx2.try_recv().is_ok());
        ctrl.emit(LabelEvent::new(EventKind::DISABLED));
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn timestamp_set_on_emit() {
        let ctrl = EventController::new();
        let rx = ctrl.subscribe_all();
        std::thread::sleep(std::time::Duration::from_millis(5));
        ctrl.emit(LabelEvent::new(EventKind::ENABLED));
        let evt = rx.try_recv().unwrap();
        assert!(evt.timestamp > 0.0);
    }
}
