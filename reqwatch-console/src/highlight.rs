//! Cumulative highlight set for rows that arrived while the view was open
//!
//! Additive only: once a row is marked it stays marked for the rest of the
//! session. This is a "new since you opened this view" marker, not a "just
//! changed" pulse. The set is reset only by sign-out.

use std::collections::HashSet;

/// Ids currently flagged for visual emphasis
#[derive(Debug, Clone, Default)]
pub struct HighlightTracker {
    ids: HashSet<String>,
}

impl HighlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tick's worth of newly-arrived ids
    pub fn accumulate(&mut self, delta: &HashSet<String>) {
        self.ids.extend(delta.iter().cloned());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    /// Drop every mark (sign-out only)
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
