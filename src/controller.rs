//! The label lifecycle state machine.
//!
//! [`LineLabeler`] interprets pointer events delivered by the host binding
//! layer and drives label creation, dragging and deletion. All state lives
//! in one explicit enum, making impossible states unrepresentable.
//!
//! ## State transitions
//!
//! ```text
//! Disabled -> Idle        (enable*, after identifier resolution succeeds)
//! Idle     -> Idle        (primary down on a registered line: create label)
//! Idle     -> Dragging    (primary down on an existing label)
//! Idle     -> Idle        (secondary down on a label: delete it)
//! Dragging -> Dragging    (pointer move: reposition the dragged label)
//! Dragging -> Idle        (pointer up)
//! Any      -> Disabled    (disable; existing labels untouched)
//! ```
//!
//! Move events observed outside a down/up pair are discarded, so drag
//! tracking never leaks across unrelated interactions.

use std::collections::HashMap;

use crate::error::LabelResult;
use crate::events::{EventController, EventKind, LabelEvent, LabelMeta};
use crate::label::{Label, LabelFactory, LabelLook};
use crate::registry::LineRegistry;
use crate::resolver::{self, IdentifierSource};
use crate::surface::{DataPos, HitTarget, LabelRef, LineRef, PlotSurface, PointerAction, PointerEvent};

/// Interaction state. At most one drag session exists at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControllerState {
    /// Pointer handling detached; clicks create nothing.
    Disabled,
    /// Armed: pointer-down events are interpreted.
    Idle,
    /// A label is being dragged; moves reposition it until pointer-up.
    Dragging { label: LabelRef },
}

/// Interactive labeler for plotted line series.
///
/// Owns the line registry, the placed labels and the enable/disable
/// binding lifecycle. It is surface-agnostic: every operation takes the
/// host [`PlotSurface`] it should act on.
pub struct LineLabeler {
    state: ControllerState,
    registry: LineRegistry,
    factory: LabelFactory,
    labels: HashMap<LabelRef, Label>,
    events: Option<EventController>,
}

impl Default for LineLabeler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineLabeler {
    pub fn new() -> Self {
        Self {
            state: ControllerState::Disabled,
            registry: LineRegistry::new(),
            factory: LabelFactory::default(),
            labels: HashMap::new(),
            events: None,
        }
    }

    /// Use a custom label presentation.
    pub fn with_look(look: LabelLook) -> Self {
        Self {
            factory: LabelFactory::new(look),
            ..Self::new()
        }
    }

    /// Attach an event controller; subscribers observe the label lifecycle.
    pub fn set_event_controller(&mut self, events: EventController) {
        self.events = Some(events);
    }

    // ── Enable / disable ─────────────────────────────────────────────────

    /// Enable labeling with default index identifiers (`"1".."N"`).
    pub fn enable<S: PlotSurface + ?Sized>(&mut self, surface: &S, lines: &[LineRef]) -> LabelResult<()> {
        self.enable_with(surface, lines, IdentifierSource::Index)
    }

    /// Enable labeling with explicit numeric identifiers.
    pub fn enable_with_values<S: PlotSurface + ?Sized>(
        &mut self,
        surface: &S,
        lines: &[LineRef],
        values: &[f64],
    ) -> LabelResult<()> {
        self.enable_with(surface, lines, IdentifierSource::Values(values.to_vec()))
    }

    /// Enable labeling with explicit text identifiers.
    pub fn enable_with_names<S: PlotSurface + ?Sized>(
        &mut self,
        surface: &S,
        lines: &[LineRef],
        names: &[String],
    ) -> LabelResult<()> {
        self.enable_with(surface, lines, IdentifierSource::Names(names.to_vec()))
    }

    /// Enable labeling with identifiers derived from the surface legend.
    pub fn enable_from_legend<S: PlotSurface + ?Sized>(
        &mut self,
        surface: &S,
        lines: &[LineRef],
    ) -> LabelResult<()> {
        self.enable_with(surface, lines, IdentifierSource::Legend)
    }

    /// General form of `enable`: resolve identifiers from `source`, then arm
    /// pointer handling.
    ///
    /// Resolution is atomic: on any validation failure the registry and the
    /// binding state are left exactly as they were. A re-entrant call while
    /// already enabled first tears down any live drag session, then rebinds
    /// with the freshly resolved registry.
    pub fn enable_with<S: PlotSurface + ?Sized>(
        &mut self,
        surface: &S,
        lines: &[LineRef],
        source: IdentifierSource,
    ) -> LabelResult<()> {
        let pairs = resolver::resolve(surface, lines, &source)?;
        self.registry.replace(pairs);
        self.state = ControllerState::Idle;
        tracing::debug!(lines = lines.len(), "interactive labeling enabled");
        self.emit(LabelEvent::new(EventKind::ENABLED));
        Ok(())
    }

    /// Stop accepting new labels. Existing labels stay on the surface.
    pub fn disable(&mut self) {
        if self.state == ControllerState::Disabled {
            return;
        }
        self.state = ControllerState::Disabled;
        tracing::debug!("interactive labeling disabled");
        self.emit(LabelEvent::new(EventKind::DISABLED));
    }

    /// Whether pointer handling is currently armed.
    pub fn is_enabled(&self) -> bool {
        self.state != ControllerState::Disabled
    }

    /// Whether a drag session is live.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ControllerState::Dragging { .. })
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// The identifier registered for `line`, if any.
    pub fn identifier(&self, line: LineRef) -> Option<&str> {
        self.registry.identifier(line)
    }

    /// Number of lines currently registered.
    pub fn registered_lines(&self) -> usize {
        self.registry.len()
    }

    /// All labels currently placed, in no particular order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.values()
    }

    /// Look up one placed label.
    pub fn label(&self, id: LabelRef) -> Option<&Label> {
        self.labels.get(&id)
    }

    // ── Pointer entry points ─────────────────────────────────────────────

    /// Handle a pointer-down event.
    ///
    /// Runtime handling performs no validation and cannot fail; events on
    /// unrecognized targets are a no-op.
    pub fn on_pointer_down<S: PlotSurface + ?Sized>(&mut self, surface: &mut S, ev: PointerEvent) {
        match self.state {
            ControllerState::Disabled => {}
            // A stray down during a live drag is ignored; the session ends
            // only on the matching pointer-up.
            ControllerState::Dragging { .. } => {}
            ControllerState::Idle => match surface.hit_test(ev.pos) {
                HitTarget::Line(line) => {
                    if ev.action == PointerAction::Primary {
                        self.create_label_for(surface, line, ev.pos);
                    }
                }
                HitTarget::Label(label) => match ev.action {
                    PointerAction::Primary => self.begin_drag(label),
                    PointerAction::Secondary => self.delete_label(surface, label),
                },
                HitTarget::None => {}
            },
        }
    }

    /// Handle a pointer-move event. Only meaningful while dragging; moves
    /// observed before a down or after the matching up are discarded.
    pub fn on_pointer_move<S: PlotSurface + ?Sized>(&mut self, surface: &mut S, pos: DataPos) {
        let ControllerState::Dragging { label } = self.state else {
            return;
        };
        let Some(entry) = self.labels.get_mut(&label) else {
            return;
        };
        entry.position = pos;
        surface.move_label(label, pos);
        surface.request_redraw();
        let meta = LabelMeta {
            label,
            position: pos,
            text: entry.text.clone(),
        };
        self.emit(LabelEvent::with_label(EventKind::LABEL_MOVED, meta));
    }

    /// Handle a pointer-up event, ending a live drag session.
    pub fn on_pointer_up<S: PlotSurface + ?Sized>(&mut self, _surface: &mut S) {
        let ControllerState::Dragging { label } = self.state else {
            return;
        };
        self.state = ControllerState::Idle;
        if let Some(entry) = self.labels.get(&label) {
            let meta = LabelMeta {
                label,
                position: entry.position,
                text: entry.text.clone(),
            };
            self.emit(LabelEvent::with_label(EventKind::DRAG_FINISHED, meta));
        }
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn create_label_for<S: PlotSurface + ?Sized>(&mut self, surface: &mut S, line: LineRef, pos: DataPos) {
        // Clicks on lines that were not part of the enable call do nothing.
        let Some(text) = self.registry.identifier(line).map(str::to_owned) else {
            return;
        };
        let label = self.factory.create(surface, pos, &text);
        let meta = LabelMeta {
            label: label.id,
            position: pos,
            text: label.text.clone(),
        };
        self.labels.insert(label.id, label);
        surface.request_redraw();
        self.emit(LabelEvent::with_label(EventKind::LABEL_CREATED, meta));
    }

    fn begin_drag(&mut self, label: LabelRef) {
        let Some(entry) = self.labels.get(&label) else {
            return;
        };
        self.state = ControllerState::Dragging { label };
        let meta = LabelMeta {
            label,
            position: entry.position,
            text: entry.text.clone(),
        };
        self.emit(LabelEvent::with_label(EventKind::DRAG_STARTED, meta));
    }

    fn delete_label<S: PlotSurface + ?Sized>(&mut self, surface: &mut S, label: LabelRef) {
        match self.labels.get(&label) {
            Some(l) if l.deletable => {}
            _ => return,
        }
        let Some(entry) = self.labels.remove(&label) else {
            return;
        };
        surface.delete_label(label);
        surface.request_redraw();
        let meta = LabelMeta {
            label,
            position: entry.position,
            text: entry.text,
        };
        self.emit(LabelEvent::with_label(EventKind::LABEL_DELETED, meta));
    }

    fn emit(&self, event: LabelEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::mock::MockSurface;

    fn enabled_labeler(surface: &MockSurface) -> LineLabeler {
        let mut labeler = LineLabeler::new();
        labeler.enable(surface, &surface.line_refs()).unwrap();
        labeler
    }

    fn down(pos: DataPos, action: PointerAction) -> PointerEvent {
        PointerEvent { pos, action }
    }

    #[test]
    fn click_on_line_creates_label_with_identifier() {
        let mut surface = MockSurface::with_lines(2);
        let mut labeler = enabled_labeler(&surface);

        surface.hit = HitTarget::Line(LineRef(2));
        let pos = DataPos::new(1.5, -0.25);
        labeler.on_pointer_down(&mut surface, down(pos, PointerAction::Primary));

        assert_eq!(labeler.labels().count(), 1);
        let label = labeler.labels().next().unwrap();
        assert_eq!(label.text, "2");
        assert_eq!(label.position, pos);
        assert!(label.deletable);
        // The host-side primitive was materialized too.
        assert_eq!(surface.labels.len(), 1);
    }

    #[test]
    fn each_click_creates_an_independent_label() {
        let mut surface = MockSurface::with_lines(1);
        let mut labeler = enabled_labeler(&surface);

        surface.hit = HitTarget::Line(LineRef(1));
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Primary));
        labeler.on_pointer_down(&mut surface, down(DataPos::new(1.0, 1.0), PointerAction::Primary));

        assert_eq!(labeler.labels().count(), 2);
        assert!(labeler.labels().all(|l| l.text == "1"));
    }

    #[test]
    fn unregistered_line_click_is_a_no_op() {
        let mut surface = MockSurface::with_lines(2);
        let mut labeler = LineLabeler::new();
        // Enable only the first line.
        labeler.enable(&surface, &[LineRef(1)]).unwrap();

        surface.hit = HitTarget::Line(LineRef(2));
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Primary));
        assert_eq!(labeler.labels().count(), 0);
    }

    #[test]
    fn drag_moves_label_and_requests_redraws() {
        let mut surface = MockSurface::with_lines(1);
        let mut labeler = enabled_labeler(&surface);

        surface.hit = HitTarget::Line(LineRef(1));
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Primary));
        let id = labeler.labels().next().unwrap().id;

        surface.hit = HitTarget::Label(id);
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Primary));
        assert!(labeler.is_dragging());

        labeler.on_pointer_move(&mut surface, DataPos::new(2.0, 3.0));
        labeler.on_pointer_move(&mut surface, DataPos::new(4.0, 5.0));
        labeler.on_pointer_up(&mut surface);

        assert!(!labeler.is_dragging());
        assert_eq!(labeler.label(id).unwrap().position, DataPos::new(4.0, 5.0));
        assert_eq!(surface.labels[&id].0, DataPos::new(4.0, 5.0));
        // No new labels appeared during the drag.
        assert_eq!(labeler.labels().count(), 1);
        assert!(surface.redraws >= 2);
    }

    #[test]
    fn moves_outside_a_drag_are_discarded() {
        let mut surface = MockSurface::with_lines(1);
        let mut labeler = enabled_labeler(&surface);

        surface.hit = HitTarget::Line(LineRef(1));
        labeler.on_pointer_down(&mut surface, down(DataPos::new(1.0, 1.0), PointerAction::Primary));
        let id = labeler.labels().next().unwrap().id;

        // Move without a preceding down-on-label.
        labeler.on_pointer_move(&mut surface, DataPos::new(9.0, 9.0));
        assert_eq!(labeler.label(id).unwrap().position, DataPos::new(1.0, 1.0));

        // Move after the matching up.
        surface.hit = HitTarget::Label(id);
        labeler.on_pointer_down(&mut surface, down(DataPos::new(1.0, 1.0), PointerAction::Primary));
        labeler.on_pointer_up(&mut surface);
        labeler.on_pointer_move(&mut surface, DataPos::new(9.0, 9.0));
        assert_eq!(labeler.label(id).unwrap().position, DataPos::new(1.0, 1.0));
    }

    #[test]
    fn secondary_click_deletes_exactly_that_label() {
        let mut surface = MockSurface::with_lines(1);
        let mut labeler = enabled_labeler(&surface);

        surface.hit = HitTarget::Line(LineRef(1));
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Primary));
        labeler.on_pointer_down(&mut surface, down(DataPos::new(1.0, 0.0), PointerAction::Primary));
        let ids: Vec<LabelRef> = labeler.labels().map(|l| l.id).collect();

        surface.hit = HitTarget::Label(ids[0]);
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Secondary));

        assert_eq!(labeler.labels().count(), 1);
        assert!(labeler.label(ids[0]).is_none());
        assert!(labeler.label(ids[1]).is_some());
        assert!(!surface.labels.contains_key(&ids[0]));
    }

    #[test]
    fn disable_blocks_creation_but_keeps_labels() {
        let mut surface = MockSurface::with_lines(1);
        let mut labeler = enabled_labeler(&surface);

        surface.hit = HitTarget::Line(LineRef(1));
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Primary));
        assert_eq!(labeler.labels().count(), 1);

        labeler.disable();
        assert!(!labeler.is_enabled());

        labeler.on_pointer_down(&mut surface, down(DataPos::new(1.0, 1.0), PointerAction::Primary));
        assert_eq!(labeler.labels().count(), 1);
        assert_eq!(surface.labels.len(), 1);
    }

    #[test]
    fn failed_enable_leaves_previous_registry_intact() {
        let surface = MockSurface::with_lines(2);
        let mut labeler = LineLabeler::new();
        labeler
            .enable_with_names(&surface, &surface.line_refs(), &["a".into(), "b".into()])
            .unwrap();

        let err = labeler.enable_with_values(&surface, &surface.line_refs(), &[1.0]);
        assert!(err.is_err());

        assert!(labeler.is_enabled());
        assert_eq!(labeler.identifier(LineRef(1)), Some("a"));
        assert_eq!(labeler.identifier(LineRef(2)), Some("b"));
        assert_eq!(labeler.registered_lines(), 2);
    }

    #[test]
    fn reenable_replaces_identifiers_and_ends_drag() {
        let mut surface = MockSurface::with_lines(2);
        let mut labeler = enabled_labeler(&surface);

        surface.hit = HitTarget::Line(LineRef(1));
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Primary));
        let id = labeler.labels().next().unwrap().id;
        surface.hit = HitTarget::Label(id);
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Primary));
        assert!(labeler.is_dragging());

        labeler
            .enable_with_names(&surface, &surface.line_refs(), &["x".into(), "y".into()])
            .unwrap();
        assert!(!labeler.is_dragging());
        assert_eq!(labeler.identifier(LineRef(1)), Some("x"));
        // The label created under the old registry survives the rebind.
        assert_eq!(labeler.labels().count(), 1);
    }

    #[test]
    fn events_are_emitted_for_the_lifecycle() {
        let mut surface = MockSurface::with_lines(1);
        let mut labeler = LineLabeler::new();
        let events = EventController::new();
        let rx = events.subscribe_all();
        labeler.set_event_controller(events);

        labeler.enable(&surface, &surface.line_refs()).unwrap();
        surface.hit = HitTarget::Line(LineRef(1));
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Primary));
        let id = labeler.labels().next().unwrap().id;
        surface.hit = HitTarget::Label(id);
        labeler.on_pointer_down(&mut surface, down(DataPos::new(0.0, 0.0), PointerAction::Primary));
        labeler.on_pointer_move(&mut surface, DataPos::new(1.0, 1.0));
        labeler.on_pointer_up(&mut surface);
        labeler.on_pointer_down(&mut surface, down(DataPos::new(1.0, 1.0), PointerAction::Secondary));
        labeler.disable();

        let kinds: Vec<EventKind> = rx.try_iter().map(|e| e.kinds).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::ENABLED,
                EventKind::LABEL_CREATED,
                EventKind::DRAG_STARTED,
                EventKind::LABEL_MOVED,
                EventKind::DRAG_FINISHED,
                EventKind::LABEL_DELETED,
                EventKind::DISABLED,
            ]
        );
    }
}
