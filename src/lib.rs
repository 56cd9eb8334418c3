//! linelabel crate root: re-exports and module wiring.
//!
//! Interactive labeling of plotted line series: clicking a line drops a
//! movable, deletable label near the click point, identifying the line by
//! an index, a user-supplied value, or a legend-derived caption.
//!
//! The crate is split into cohesive modules:
//! - `surface`: the collaborator trait to the host plotting surface
//! - `registry`: durable line-to-identifier association
//! - `resolver`: identifier computation and validation
//! - `controller`: the pointer-event state machine (`LineLabeler`)
//! - `label`: label records, presentation, factory
//! - `events`: subscription to label lifecycle events
//! - `plot` / `app`: the bundled egui_plot surface and run helper

mod controller;
mod registry;
mod resolver;

pub mod app;
pub mod error;
pub mod events;
pub mod label;
pub mod plot;
pub mod surface;

// Public re-exports for a compact external API
pub use app::{run_labeled, LabeledPlotApp};
pub use controller::LineLabeler;
pub use error::{LabelError, LabelResult};
pub use events::{EventController, EventFilter, EventKind, LabelEvent, LabelMeta};
pub use label::{Label, LabelFactory, LabelLook};
pub use plot::LabeledPlot;
pub use resolver::IdentifierSource;
pub use surface::{
    AxesRef, DataPos, HitTarget, LabelRef, LegendInfo, LineRef, PlotSurface, PointerAction,
    PointerEvent,
};
