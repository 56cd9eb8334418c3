//! Identifier resolution: computing one identifier string per line from an
//! [`IdentifierSource`], with full validation up front.
//!
//! Resolution runs once at enable-time and produces the complete positional
//! list before anything is registered, so a failing call leaves no partial
//! state behind.

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, LabelResult};
use crate::surface::{LegendInfo, LineRef, PlotSurface};

/// Where label identifiers come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IdentifierSource {
    /// Default: identifiers are `"1".."N"` in input order.
    Index,
    /// Explicit numeric identifiers, stringified element-wise.
    /// Must have exactly one entry per line.
    Values(Vec<f64>),
    /// Explicit text identifiers, used verbatim.
    /// Must have exactly one entry per line.
    Names(Vec<String>),
    /// Derive identifiers from the legend owning the lines' axes.
    Legend,
}

impl Default for IdentifierSource {
    fn default() -> Self {
        Self::Index
    }
}

/// Resolve the identifier for every line in `lines`, in input order.
///
/// Validates that every reference is a line of `surface` and that the
/// source cardinality matches. For [`IdentifierSource::Legend`] the legend
/// is matched to the axes owning the first line; the surface having no
/// legend at all is [`LabelError::NoLegendFound`], while legends that
/// cannot be matched one-to-one to those axes are
/// [`LabelError::LegendResolutionAmbiguous`].
pub fn resolve<S: PlotSurface + ?Sized>(
    surface: &S,
    lines: &[LineRef],
    source: &IdentifierSource,
) -> LabelResult<Vec<(LineRef, String)>> {
    for line in lines {
        if !surface.contains_line(*line) {
            return Err(LabelError::InvalidInput(*line));
        }
    }

    let identifiers = match source {
        IdentifierSource::Index => (1..=lines.len()).map(|i| i.to_string()).collect(),
        IdentifierSource::Values(values) => {
            check_cardinality(lines.len(), values.len())?;
            values.iter().map(|v| v.to_string()).collect()
        }
        IdentifierSource::Names(names) => {
            check_cardinality(lines.len(), names.len())?;
            names.clone()
        }
        IdentifierSource::Legend => legend_captions(surface, lines)?,
    };

    tracing::debug!(lines = lines.len(), ?source, "resolved line identifiers");

    let pairs: Vec<(LineRef, String)> = lines.iter().copied().zip(identifiers).collect();
    Ok(pairs)
}

fn check_cardinality(expected: usize, got: usize) -> LabelResult<()> {
    if expected != got {
        return Err(LabelError::CardinalityMismatch { expected, got });
    }
    Ok(())
}

/// Find the one legend belonging to the axes that own the lines and return
/// its captions in display order.
fn legend_captions<S: PlotSurface + ?Sized>(surface: &S, lines: &[LineRef]) -> LabelResult<Vec<String>> {
    let legends = surface.legends();
    if legends.is_empty() {
        return Err(LabelError::NoLegendFound);
    }

    // The first line's axes is authoritative for the lookup. An empty line
    // list cannot name any axes, so it also fails the cardinality check below
    // against whatever single legend exists; reject it up front instead.
    let axes = lines
        .first()
        .and_then(|l| surface.line_axes(*l))
        .ok_or(LabelError::NoLegendFound)?;

    let matching: Vec<&LegendInfo> = legends.iter().filter(|lg| lg.axes == axes).collect();
    let legend = match matching.as_slice() {
        [lg] => *lg,
        other => {
            return Err(LabelError::LegendResolutionAmbiguous {
                candidates: other.len(),
            })
        }
    };

    check_cardinality(lines.len(), legend.captions.len())?;
    Ok(legend.captions.clone())
}
