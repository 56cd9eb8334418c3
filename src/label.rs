//! Labels: the placed annotation record, its presentation hints, and the
//! factory that materializes label primitives on the host surface.

use serde::{Deserialize, Serialize};

use crate::surface::{DataPos, LabelRef, PlotSurface};

/// A label placed on the surface.
///
/// Labels are independent once placed: they carry no link back to the
/// line they were created from, and a line may own any number of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Handle of the host-side label primitive.
    pub id: LabelRef,
    /// Current position in data-space coordinates.
    pub position: DataPos,
    /// The identifier text shown by the label.
    pub text: String,
    /// Whether the deletion affordance is armed for this label.
    pub deletable: bool,
}

/// The visual presentation of labels (size, color hint, background fill).
///
/// The background fill distinguishes labels from underlying data. It is a
/// presentation hint, not a correctness requirement; hosts lacking the
/// capability may ignore it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelLook {
    /// Text size in points.
    pub text_size: f32,
    /// Optional color hint for the label text (RGB).
    pub color_hint: Option<[u8; 3]>,
    /// Whether to draw a background fill behind the text.
    pub background: bool,
}

impl Default for LabelLook {
    fn default() -> Self {
        Self {
            text_size: 13.0,
            color_hint: None,
            background: true,
        }
    }
}

/// Constructs labels on a host surface.
#[derive(Debug, Clone, Default)]
pub struct LabelFactory {
    look: LabelLook,
}

impl LabelFactory {
    pub fn new(look: LabelLook) -> Self {
        Self { look }
    }

    pub fn look(&self) -> &LabelLook {
        &self.look
    }

    /// Materialize a label primitive at `pos` with `text`.
    ///
    /// The returned record mirrors the host-side primitive; the deletion
    /// affordance is armed on every factory-made label.
    pub fn create<S: PlotSurface + ?Sized>(&self, surface: &mut S, pos: DataPos, text: &str) -> Label {
        let id = surface.create_label(pos, text, &self.look);
        Label {
            id,
            position: pos,
            text: text.to_owned(),
            deletable: true,
        }
    }
}
