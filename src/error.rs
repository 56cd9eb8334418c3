//! Error types for identifier resolution and enabling.
//!
//! All errors are raised synchronously during `enable*`; pointer-event
//! handling never fails (unrecognized targets are a no-op).

use thiserror::Error;

use crate::surface::LineRef;

/// Errors that can occur while enabling interactive labeling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// A reference passed as a line is not a line primitive of the surface.
    #[error("not a line on this surface: {0:?}")]
    InvalidInput(LineRef),

    /// The identifier source length does not match the number of lines.
    #[error("identifier source has {got} entries for {expected} lines")]
    CardinalityMismatch { expected: usize, got: usize },

    /// Legend mode was requested but the surface has no legend.
    #[error("no legend found on the surface")]
    NoLegendFound,

    /// Legend mode was requested but no single legend matches the lines' axes.
    #[error("cannot match a legend to the lines' axes ({candidates} candidate(s))")]
    LegendResolutionAmbiguous { candidates: usize },
}

/// Result type alias for labeling operations.
pub type LabelResult<T> = Result<T, LabelError>;
