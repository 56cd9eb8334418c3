//! Collaborator interface to the host plotting surface.
//!
//! The labeling state machine is surface-agnostic: it talks to the host
//! through the [`PlotSurface`] trait, which provides line membership and
//! axes lookup, legend enumeration, pointer hit-testing and the label
//! primitives. The bundled egui_plot adapter in [`crate::plot`] is one
//! implementation; tests use lightweight mocks.

/// Opaque handle identifying one plotted line primitive on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRef(pub u64);

/// Opaque handle identifying one label primitive created on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelRef(pub u64);

/// Opaque handle identifying one axes (sub-plot) of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxesRef(pub u64);

/// A position in data-space coordinates (the coordinate system of the
/// plotted values, not pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPos {
    pub x: f64,
    pub y: f64,
}

impl DataPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a pointer event landed on, as reported by surface hit-testing.
///
/// Pointer dispatch matches on this tagged result; there is no runtime
/// type introspection anywhere in the event path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The pointer hit a plotted line.
    Line(LineRef),
    /// The pointer hit an existing label.
    Label(LabelRef),
    /// The pointer hit neither.
    None,
}

/// Which pointer action triggered an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// The primary button (create / begin drag).
    Primary,
    /// The secondary/alternate button (deletion affordance).
    Secondary,
}

/// A pointer-down event delivered by the host binding layer, already
/// converted to data-space coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub pos: DataPos,
    pub action: PointerAction,
}

/// One legend widget of the surface: the axes it belongs to plus its
/// captions in display order.
#[derive(Debug, Clone)]
pub struct LegendInfo {
    pub axes: AxesRef,
    pub captions: Vec<String>,
}

/// The host plotting surface as seen by the labeling machinery.
///
/// Query methods are used once at enable-time (validation and legend
/// resolution); the label primitives are invoked from the pointer-event
/// handlers. All calls happen synchronously on the UI thread.
pub trait PlotSurface {
    /// Whether `line` refers to a line primitive known to this surface.
    fn contains_line(&self, line: LineRef) -> bool;

    /// The axes owning `line`, if the line is known.
    fn line_axes(&self, line: LineRef) -> Option<AxesRef>;

    /// All legends currently present on the surface.
    fn legends(&self) -> Vec<LegendInfo>;

    /// Hit-test a data-space position against lines and labels.
    ///
    /// Labels take precedence over lines when both are under the pointer
    /// (a placed label always sits on top of the data).
    fn hit_test(&self, pos: DataPos) -> HitTarget;

    /// Materialize a label primitive at `pos` and return its handle.
    ///
    /// The `look` is a presentation hint (background fill, size); hosts
    /// lacking a capability may ignore parts of it.
    fn create_label(&mut self, pos: DataPos, text: &str, look: &crate::label::LabelLook) -> LabelRef;

    /// Move an existing label primitive to `pos`. Unknown handles are a no-op.
    fn move_label(&mut self, label: LabelRef, pos: DataPos);

    /// Remove an existing label primitive. Unknown handles are a no-op.
    fn delete_label(&mut self, label: LabelRef);

    /// Ask the host to repaint after a label changed.
    fn request_redraw(&mut self);
}
