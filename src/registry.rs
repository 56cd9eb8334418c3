//! LineRegistry: durable association of plotted lines with identifier text.
//!
//! Identifiers live in an explicit registry owned by the labeler, keyed by
//! the stable [`LineRef`] handle; nothing is stashed on host objects. The
//! registry is replaced wholesale by a successful `enable*` call and is
//! read-only afterwards, so every registered line has exactly one
//! identifier for its whole lifetime.

use std::collections::HashMap;

use crate::surface::LineRef;

/// Maps each registered line to its immutable identifier string.
#[derive(Debug, Clone, Default)]
pub struct LineRegistry {
    entries: HashMap<LineRef, String>,
}

impl LineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole registry with freshly resolved identifiers.
    ///
    /// Called exactly once per successful enable; the caller validates the
    /// pairs beforehand so no partial state can be observed.
    pub(crate) fn replace(&mut self, pairs: Vec<(LineRef, String)>) {
        self.entries = pairs.into_iter().collect();
    }

    /// Look up the identifier of a registered line.
    pub fn identifier(&self, line: LineRef) -> Option<&str> {
        self.entries.get(&line).map(|s| s.as_str())
    }

    /// Whether `line` is registered.
    pub fn contains(&self, line: LineRef) -> bool {
        self.entries.contains_key(&line)
    }

    /// Number of registered lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
